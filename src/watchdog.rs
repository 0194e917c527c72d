use crate::bootstrap::BootstrapFacts;
use crate::nettools::NeighborTools;

/// Interval between neighbor-table polls, in seconds.
pub const WATCHDOG_INTERVAL_SECS: u64 = 30;

/// Periodic neighbor-table observer. Owns the last captured table text and
/// reports a change only when the newly polled text differs byte-for-byte.
/// The initial snapshot is empty, so the first non-empty read always reports.
#[derive(Debug, Clone, Default)]
pub struct ArpWatchdog {
    snapshot: String,
}

impl ArpWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }

    /// Polls the neighbor table once. A failed dump degrades to empty text
    /// and compares like an empty table.
    pub fn tick(&mut self, tools: &mut dyn NeighborTools) -> TickOutcome {
        let observed = tools.dump();
        if observed.text() == self.snapshot {
            return TickOutcome::Unchanged;
        }
        self.snapshot = observed.text().to_string();
        TickOutcome::Updated(self.snapshot.clone())
    }
}

/// Result of one watchdog poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Unchanged,
    Updated(String),
}

/// One-shot neighbor-cache flush gate, run before each scheduled reload.
///
/// Starts enabled. The first flush attempt that produces no output disables
/// the gate for the remainder of the process: empty output means the flush
/// command is unsupported in this environment. The transition is monotonic
/// and must not be split across concurrent invocations; when the gate is
/// shared between threads the whole `flush_before_reload` call runs under
/// the owning lock.
#[derive(Debug, Clone)]
pub struct FlushGate {
    enabled: bool,
}

impl Default for FlushGate {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FlushGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Attempts the flush that precedes a reload. The flush only runs when
    /// the gate is enabled and all three bootstrap identity facts hold.
    pub fn flush_before_reload(
        &mut self,
        tools: &mut dyn NeighborTools,
        facts: &BootstrapFacts,
    ) -> FlushOutcome {
        if !self.enabled {
            return FlushOutcome::Disabled;
        }
        if !facts.fully_provisioned() {
            return FlushOutcome::Skipped;
        }
        let outcome = tools.flush();
        if outcome.is_empty() {
            self.enabled = false;
            return FlushOutcome::Unsupported;
        }
        FlushOutcome::Flushed(outcome.text().to_string())
    }
}

/// Result of the pre-reload flush step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Flush ran and produced output; the gate stays enabled.
    Flushed(String),
    /// Flush ran but produced nothing; the gate is now permanently disabled.
    Unsupported,
    /// The gate was already disabled.
    Disabled,
    /// Identity facts are incomplete; flush not attempted, gate untouched.
    Skipped,
}
