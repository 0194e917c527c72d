use crate::logging::{emit, LogLevel, SharedLogger};
use std::process::Command;

/// Regenerates the balancer configuration and reloads the balancer process.
/// Invocations are idempotent from the agent's point of view; failures are
/// the implementation's concern and must not propagate into the loop.
pub trait Reloader {
    fn reload(&mut self);
}

/// Reloader that shells out to the configured reload command.
pub struct CommandReloader {
    command: Vec<String>,
    logger: SharedLogger,
}

impl CommandReloader {
    pub fn new(command: Vec<String>, logger: SharedLogger) -> Self {
        Self { command, logger }
    }
}

impl Reloader for CommandReloader {
    fn reload(&mut self) {
        let (program, args) = match self.command.split_first() {
            Some(split) => split,
            None => {
                emit(
                    &self.logger,
                    LogLevel::Warn,
                    "reload",
                    "no reload command configured; skipping reload",
                );
                return;
            }
        };
        match Command::new(program).args(args).output() {
            Ok(output) if output.status.success() => {
                emit(
                    &self.logger,
                    LogLevel::Debug,
                    "reload",
                    &format!("reload command `{program}` completed"),
                );
            }
            Ok(output) => {
                emit(
                    &self.logger,
                    LogLevel::Warn,
                    "reload",
                    &format!(
                        "reload command `{program}` exited with {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                );
            }
            Err(err) => {
                emit(
                    &self.logger,
                    LogLevel::Warn,
                    "reload",
                    &format!("reload command `{program}` failed to start: {err}"),
                );
            }
        }
    }
}
