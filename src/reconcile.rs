use crate::bootstrap::BootstrapFacts;
use crate::classifier::{Classifier, Verdict};
use crate::event::LifecycleEvent;
use crate::logging::{emit, LogLevel, SharedLogger};
use crate::nettools::NeighborTools;
use crate::registry::LinkedServiceRegistry;
use crate::reload::Reloader;
use crate::stream::{EventSource, StreamSignal};
use crate::uri;
use crate::watchdog::{FlushGate, FlushOutcome};

/// Drives the event stream: classifies each delivered event, mutates the
/// linked-service registry, and invokes the reloader. Events are processed
/// strictly in arrival order; for a given event the registry replacement
/// happens before the reload it triggers.
pub struct ReconcileLoop {
    facts: BootstrapFacts,
    registry: LinkedServiceRegistry,
    classifier: Classifier,
    reloader: Box<dyn Reloader>,
    tools: Box<dyn NeighborTools>,
    flush_gate: FlushGate,
    logger: SharedLogger,
}

impl ReconcileLoop {
    pub fn new(
        facts: BootstrapFacts,
        classifier: Classifier,
        reloader: Box<dyn Reloader>,
        tools: Box<dyn NeighborTools>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            facts,
            registry: LinkedServiceRegistry::default(),
            classifier,
            reloader,
            tools,
            flush_gate: FlushGate::new(),
            logger,
        }
    }

    /// Seeds the registry, e.g. from bootstrap configuration.
    pub fn with_registry(mut self, registry: LinkedServiceRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &LinkedServiceRegistry {
        &self.registry
    }

    pub fn flush_gate(&self) -> &FlushGate {
        &self.flush_gate
    }

    /// Drains the source, dispatching every signal. Returns once the source
    /// is exhausted; the production HTTP source never is.
    pub fn run(&mut self, source: &mut dyn EventSource) {
        while let Some(signal) = source.next_signal() {
            match signal {
                StreamSignal::Opened => self.on_open(),
                StreamSignal::Event(event) => self.on_event(&event),
            }
        }
    }

    /// Cold-start reconciliation: the backend state before this connection
    /// is unknown, so reload unconditionally. Runs once per (re)open.
    pub fn on_open(&mut self) {
        emit(
            &self.logger,
            LogLevel::Info,
            "reconcile",
            "event stream open, reloading backend list",
        );
        self.run_reload();
    }

    pub fn on_event(&mut self, event: &LifecycleEvent) {
        emit(
            &self.logger,
            LogLevel::Debug,
            "reconcile",
            &format!(
                "event: {} {} is {}",
                event.kind_label(),
                uri::display_identifier(&event.resource_uri),
                event.state_label()
            ),
        );
        let classification = self.classifier.classify(event, &self.registry);
        if let Some(err) = classification.directory_error {
            emit(
                &self.logger,
                LogLevel::Warn,
                "reconcile",
                &format!("linked-service lookup failed, keeping current set: {err}"),
            );
        }
        match classification.verdict {
            Verdict::Ignore => {}
            Verdict::ReloadOnly => {
                emit(
                    &self.logger,
                    LogLevel::Info,
                    "reconcile",
                    &format!(
                        "lifecycle change: {} {} is {}",
                        event.kind_label(),
                        uri::display_identifier(&event.resource_uri),
                        event.state_label()
                    ),
                );
                self.run_reload();
            }
            Verdict::UpdateAndReload { endpoints, diff } => {
                emit(
                    &self.logger,
                    LogLevel::Info,
                    "reconcile",
                    &format!("link topology changed: {}", diff.describe()),
                );
                self.registry.replace(endpoints);
                self.run_reload();
            }
        }
    }

    /// Flush-then-reload sequence shared by cold start and event handling.
    fn run_reload(&mut self) {
        match self
            .flush_gate
            .flush_before_reload(self.tools.as_mut(), &self.facts)
        {
            FlushOutcome::Flushed(output) => emit(
                &self.logger,
                LogLevel::Info,
                "reconcile",
                &format!("flushed neighbor table:\n{output}"),
            ),
            FlushOutcome::Unsupported => emit(
                &self.logger,
                LogLevel::Debug,
                "reconcile",
                "neighbor flush produced no output; disabling flush for this process",
            ),
            FlushOutcome::Disabled | FlushOutcome::Skipped => {}
        }
        self.reloader.reload();
    }
}
