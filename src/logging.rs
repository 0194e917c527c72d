use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Severity levels for agent log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the canonical uppercase representation.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation policy (default 64 MiB x 5 files; the agent logs little).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRotationPolicy {
    pub max_bytes: usize,
    pub max_files: usize,
}

impl Default for LogRotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 64 << 20,
            max_files: 5,
        }
    }
}

/// Accumulated log lines for a rotated segment.
#[derive(Debug, Default, Clone)]
pub struct LogFile {
    lines: Vec<String>,
    bytes_written: usize,
}

impl LogFile {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

/// JSON-line logger with deterministic rotation semantics. When stdout echo
/// is enabled each emitted line is also printed, which is how the agent logs
/// in production; tests keep echo off and inspect `files()`.
#[derive(Debug, Clone)]
pub struct JsonLineLogger {
    policy: LogRotationPolicy,
    current_level: LogLevel,
    echo_stdout: bool,
    files: VecDeque<LogFile>,
    active: LogFile,
}

impl JsonLineLogger {
    pub fn new(policy: LogRotationPolicy) -> Self {
        Self {
            policy,
            current_level: LogLevel::Info,
            echo_stdout: false,
            files: VecDeque::new(),
            active: LogFile::default(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.current_level = level;
        self
    }

    pub fn with_stdout_echo(mut self, echo: bool) -> Self {
        self.echo_stdout = echo;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.current_level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.current_level = level;
    }

    /// Emits a JSON-line log entry. Records below the current level are
    /// dropped silently.
    pub fn log(&mut self, level: LogLevel, module: &str, message: &str) -> Result<(), LoggingError> {
        if level < self.current_level {
            return Ok(());
        }
        let record = LogRecord {
            ts_ms: now_ms(),
            level: level.as_str(),
            module,
            message,
        };
        let line = serde_json::to_string(&record).map_err(LoggingError::Serialize)?;
        if self.echo_stdout {
            println!("{line}");
        }
        self.rotate_if_needed(line.len());
        self.active.bytes_written = self.active.bytes_written.saturating_add(line.len());
        self.active.lines.push(line);
        Ok(())
    }

    /// Returns rotated history followed by the active segment.
    pub fn files(&self) -> impl Iterator<Item = &LogFile> {
        self.files.iter().chain(std::iter::once(&self.active))
    }

    /// All retained lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.files()
            .flat_map(|file| file.lines().iter().cloned())
            .collect()
    }

    fn rotate_if_needed(&mut self, next_line_len: usize) {
        if self.active.bytes_written + next_line_len <= self.policy.max_bytes {
            return;
        }
        if !self.active.lines.is_empty() {
            self.files.push_back(std::mem::take(&mut self.active));
            while self.files.len() > self.policy.max_files {
                self.files.pop_front();
            }
        }
        self.active = LogFile::default();
    }
}

/// Errors surfaced while serializing JSON-line logs.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    ts_ms: u64,
    level: &'a str,
    module: &'a str,
    message: &'a str,
}

/// Logger handle shared between the reconcile loop and the watchdog thread.
pub type SharedLogger = Arc<Mutex<JsonLineLogger>>;

/// Creates a shared logger at the given level with stdout echo enabled.
pub fn shared(level: LogLevel) -> SharedLogger {
    Arc::new(Mutex::new(
        JsonLineLogger::new(LogRotationPolicy::default())
            .with_level(level)
            .with_stdout_echo(true),
    ))
}

/// Creates a silent shared logger for tests.
pub fn shared_for_tests() -> SharedLogger {
    Arc::new(Mutex::new(
        JsonLineLogger::new(LogRotationPolicy::default()).with_level(LogLevel::Debug),
    ))
}

/// Logs through the shared handle. A poisoned lock drops the record; losing
/// a log line is preferable to propagating a panic between loops.
pub fn emit(logger: &SharedLogger, level: LogLevel, module: &str, message: &str) {
    if let Ok(mut guard) = logger.lock() {
        let _ = guard.log(level, module, message);
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis().min(u128::from(u64::MAX)) as u64)
        .unwrap_or(0)
}
