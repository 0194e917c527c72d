use crate::bootstrap::{BootstrapFacts, RunMode};
use crate::classifier::Classifier;
use crate::config::AgentConfig;
use crate::directory::HttpDirectory;
use crate::logging::{self, emit, LogLevel, SharedLogger};
use crate::nettools::SystemNeighborTools;
use crate::reconcile::ReconcileLoop;
use crate::reload::{CommandReloader, Reloader};
use crate::stream::HttpEventSource;
use crate::watchdog::{ArpWatchdog, FlushGate, FlushOutcome, TickOutcome, WATCHDOG_INTERVAL_SECS};
use anyhow::{Context, Result};
use std::thread;
use std::time::Duration;

/// Application entrypoint. Resolves configuration, picks a run mode from the
/// bootstrap facts, and hands control to the selected loop.
pub fn run() -> Result<()> {
    let config = AgentConfig::from_env()?;
    let logger = logging::shared(config.log_level());
    let facts = config.bootstrap_facts();

    match RunMode::decide(&facts) {
        RunMode::Reactive => run_reactive(&config, facts, logger),
        RunMode::OneShotNoApi => {
            emit(
                &logger,
                LogLevel::Warn,
                "app",
                "running in the platform without API access; automatic backend \
                 reconfiguration is unavailable, reloading once",
            );
            run_once(&config, &facts, &logger);
            Ok(())
        }
        RunMode::OneShotOutsidePlatform => {
            emit(
                &logger,
                LogLevel::Info,
                "app",
                "not running inside the platform, reloading once",
            );
            run_once(&config, &facts, &logger);
            Ok(())
        }
    }
}

/// Reactive mode: watchdog timer plus the event-driven reconcile loop. Does
/// not return during normal operation.
fn run_reactive(config: &AgentConfig, facts: BootstrapFacts, logger: SharedLogger) -> Result<()> {
    let service_uri = facts
        .service_uri
        .clone()
        .context("reactive mode requires a service URI")?;
    let auth = config
        .api_auth
        .clone()
        .context("reactive mode requires API credentials")?;

    emit(
        &logger,
        LogLevel::Info,
        "app",
        "platform API access available; reloading backend list in real time",
    );
    spawn_watchdog(logger.clone());

    let directory = HttpDirectory::new(&config.api_url, &auth)?;
    let classifier = Classifier::new(service_uri, Box::new(directory));
    let reloader = CommandReloader::new(config.reload_command.clone(), logger.clone());
    let mut reconcile = ReconcileLoop::new(
        facts,
        classifier,
        Box::new(reloader),
        Box::new(SystemNeighborTools),
        logger,
    );
    let mut source = HttpEventSource::new(&config.events_url, &auth)?;
    reconcile.run(&mut source);
    Ok(())
}

/// One-shot fallback: a single flush-then-reload, then exit.
fn run_once(config: &AgentConfig, facts: &BootstrapFacts, logger: &SharedLogger) {
    let mut tools = SystemNeighborTools;
    let mut gate = FlushGate::new();
    if let FlushOutcome::Flushed(output) = gate.flush_before_reload(&mut tools, facts) {
        emit(
            logger,
            LogLevel::Info,
            "app",
            &format!("flushed neighbor table:\n{output}"),
        );
    }
    let mut reloader = CommandReloader::new(config.reload_command.clone(), logger.clone());
    reloader.reload();
}

/// Polls the neighbor table every `WATCHDOG_INTERVAL_SECS` on its own
/// thread. The watchdog owns its snapshot; only the logger is shared.
fn spawn_watchdog(logger: SharedLogger) {
    let spawned = thread::Builder::new()
        .name("arp-watchdog".to_string())
        .spawn(move || {
            let mut watchdog = ArpWatchdog::new();
            let mut tools = SystemNeighborTools;
            loop {
                thread::sleep(Duration::from_secs(WATCHDOG_INTERVAL_SECS));
                if let TickOutcome::Updated(table) = watchdog.tick(&mut tools) {
                    emit(
                        &logger,
                        LogLevel::Info,
                        "watchdog",
                        &format!("neighbor table updated:\n{table}"),
                    );
                }
            }
        });
    if let Err(err) = spawned {
        eprintln!("failed to start watchdog thread: {err}");
    }
}
