//! Reactive reconfiguration agent for a load balancer running on an
//! orchestration platform. Watches the platform's lifecycle event stream and
//! reloads the balancer's backend list whenever an event implies it changed,
//! while keeping the host's neighbor (ARP) cache fresh.

pub mod app;
pub mod bootstrap;
pub mod classifier;
pub mod config;
pub mod directory;
pub mod event;
pub mod logging;
pub mod nettools;
pub mod reconcile;
pub mod registry;
pub mod reload;
pub mod stream;
pub mod uri;
pub mod watchdog;

pub use bootstrap::{BootstrapFacts, RunMode};
pub use classifier::{Classification, Classifier, Verdict};
pub use config::{AgentConfig, ConfigError};
pub use directory::{Directory, DirectoryError, HttpDirectory, ServiceLink, ServiceRecord};
pub use event::{EventKind, LifecycleEvent, LifecycleState};
pub use logging::{
    emit, JsonLineLogger, LogFile, LogLevel, LogRotationPolicy, LoggingError, SharedLogger,
};
pub use nettools::{
    CommandOutcome, NeighborTools, SystemNeighborTools, ARP_DUMP_COMMAND, ARP_FLUSH_COMMAND,
};
pub use reconcile::ReconcileLoop;
pub use registry::{LinkDiff, LinkedServiceRegistry};
pub use reload::{CommandReloader, Reloader};
pub use stream::{EventSource, HttpEventSource, StreamError, StreamSignal, RECONNECT_DELAY_SECS};
pub use uri::{display_identifier, uuid_from_resource_uri};
pub use watchdog::{ArpWatchdog, FlushGate, FlushOutcome, TickOutcome, WATCHDOG_INTERVAL_SECS};
