use relink::{
    logging, BootstrapFacts, Classifier, CommandOutcome, Directory, DirectoryError, EventSource,
    LifecycleEvent, LinkedServiceRegistry, NeighborTools, ReconcileLoop, Reloader, ServiceLink,
    ServiceRecord, StreamSignal,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const SELF_SERVICE: &str = "/api/service/self";

struct ScriptedSource {
    signals: VecDeque<StreamSignal>,
}

impl ScriptedSource {
    fn new(signals: Vec<StreamSignal>) -> Self {
        Self {
            signals: signals.into(),
        }
    }
}

impl EventSource for ScriptedSource {
    fn next_signal(&mut self) -> Option<StreamSignal> {
        self.signals.pop_front()
    }
}

struct RecordingReloader {
    reloads: Arc<Mutex<usize>>,
}

impl Reloader for RecordingReloader {
    fn reload(&mut self) {
        *self.reloads.lock().unwrap() += 1;
    }
}

struct QuietTools;

impl NeighborTools for QuietTools {
    fn dump(&mut self) -> CommandOutcome {
        CommandOutcome::empty()
    }

    fn flush(&mut self) -> CommandOutcome {
        CommandOutcome::empty()
    }
}

struct StaticDirectory {
    endpoints: Vec<String>,
}

impl Directory for StaticDirectory {
    fn fetch(&mut self, _resource_uri: &str) -> Result<ServiceRecord, DirectoryError> {
        Ok(ServiceRecord {
            linked_to_service: self
                .endpoints
                .iter()
                .map(|endpoint| ServiceLink {
                    to_service: endpoint.clone(),
                })
                .collect(),
        })
    }
}

struct FailingDirectory;

impl Directory for FailingDirectory {
    fn fetch(&mut self, _resource_uri: &str) -> Result<ServiceRecord, DirectoryError> {
        Err(DirectoryError::Request("connection refused".to_string()))
    }
}

fn provisioned_facts() -> BootstrapFacts {
    BootstrapFacts {
        container_uri: Some("/api/container/self".to_string()),
        service_uri: Some(SELF_SERVICE.to_string()),
        has_api_auth: true,
    }
}

fn loop_with(
    directory: Box<dyn Directory>,
    registry: LinkedServiceRegistry,
) -> (ReconcileLoop, Arc<Mutex<usize>>) {
    let reloads = Arc::new(Mutex::new(0));
    let reloader = RecordingReloader {
        reloads: reloads.clone(),
    };
    let reconcile = ReconcileLoop::new(
        provisioned_facts(),
        Classifier::new(SELF_SERVICE, directory),
        Box::new(reloader),
        Box::new(QuietTools),
        logging::shared_for_tests(),
    )
    .with_registry(registry);
    (reconcile, reloads)
}

fn registry(endpoints: &[&str]) -> LinkedServiceRegistry {
    LinkedServiceRegistry::new(endpoints.iter().map(|s| s.to_string()).collect())
}

#[test]
fn stream_open_performs_cold_start_reload() {
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory { endpoints: vec![] }),
        registry(&[]),
    );
    let mut source = ScriptedSource::new(vec![StreamSignal::Opened]);
    reconcile.run(&mut source);
    assert_eq!(*reloads.lock().unwrap(), 1);
}

#[test]
fn each_reopen_reloads_exactly_once() {
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory { endpoints: vec![] }),
        registry(&[]),
    );
    let mut source = ScriptedSource::new(vec![StreamSignal::Opened, StreamSignal::Opened]);
    reconcile.run(&mut source);
    assert_eq!(*reloads.lock().unwrap(), 2);
}

#[test]
fn tracked_backend_stop_reloads_without_registry_change() {
    // Scenario: container X stopped while {X, Y} are linked.
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory { endpoints: vec![] }),
        registry(&["X", "Y"]),
    );
    let event = LifecycleEvent::new(
        "container",
        "Stopped",
        vec!["X".to_string()],
        "/api/container/x1/",
    );
    let mut source = ScriptedSource::new(vec![StreamSignal::Event(event)]);
    reconcile.run(&mut source);
    assert_eq!(*reloads.lock().unwrap(), 1);
    assert_eq!(
        reconcile.registry().endpoints(),
        ["X".to_string(), "Y".to_string()]
    );
}

#[test]
fn transient_event_is_ignored() {
    // Scenario: container X is Starting; no reload.
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory { endpoints: vec![] }),
        registry(&["X"]),
    );
    let event = LifecycleEvent::new(
        "container",
        "Starting",
        vec!["X".to_string()],
        "/api/container/x1/",
    );
    let mut source = ScriptedSource::new(vec![StreamSignal::Event(event)]);
    reconcile.run(&mut source);
    assert_eq!(*reloads.lock().unwrap(), 0);
}

#[test]
fn topology_change_updates_registry_then_reloads() {
    // Scenario: directory now links {X, Y}; current set is {X}.
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory {
            endpoints: vec!["X".to_string(), "Y".to_string()],
        }),
        registry(&["X"]),
    );
    let event = LifecycleEvent::new(
        "service",
        "Success",
        vec![SELF_SERVICE.to_string()],
        SELF_SERVICE,
    );
    let mut source = ScriptedSource::new(vec![StreamSignal::Event(event)]);
    reconcile.run(&mut source);
    assert_eq!(*reloads.lock().unwrap(), 1);
    assert_eq!(
        reconcile.registry().endpoints(),
        ["X".to_string(), "Y".to_string()]
    );
}

#[test]
fn repeated_topology_event_reloads_only_once() {
    // After adopting the directory's set, replaying the same Success event
    // diffs empty and stays silent.
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory {
            endpoints: vec!["X".to_string(), "Y".to_string()],
        }),
        registry(&["X"]),
    );
    let event = LifecycleEvent::new(
        "service",
        "Success",
        vec![SELF_SERVICE.to_string()],
        SELF_SERVICE,
    );
    let mut source = ScriptedSource::new(vec![
        StreamSignal::Event(event.clone()),
        StreamSignal::Event(event),
    ]);
    reconcile.run(&mut source);
    assert_eq!(*reloads.lock().unwrap(), 1);
}

#[test]
fn directory_failure_is_not_fatal() {
    let (mut reconcile, reloads) = loop_with(Box::new(FailingDirectory), registry(&["X"]));
    let event = LifecycleEvent::new(
        "service",
        "Success",
        vec![SELF_SERVICE.to_string()],
        SELF_SERVICE,
    );
    let after = LifecycleEvent::new(
        "container",
        "Stopped",
        vec!["X".to_string()],
        "/api/container/x1/",
    );
    let mut source = ScriptedSource::new(vec![
        StreamSignal::Event(event),
        StreamSignal::Event(after),
    ]);
    reconcile.run(&mut source);
    // The failed fetch produced no reload; the next qualifying event did.
    assert_eq!(*reloads.lock().unwrap(), 1);
    assert_eq!(reconcile.registry().endpoints(), ["X".to_string()]);
}

#[test]
fn flush_gate_latches_after_first_unsupported_flush() {
    let (mut reconcile, reloads) = loop_with(
        Box::new(StaticDirectory { endpoints: vec![] }),
        registry(&[]),
    );
    let mut source = ScriptedSource::new(vec![StreamSignal::Opened, StreamSignal::Opened]);
    reconcile.run(&mut source);
    // QuietTools returns empty flush output: the first reload disables the
    // gate, the second reload skips it, and both reloads still happen.
    assert!(!reconcile.flush_gate().is_enabled());
    assert_eq!(*reloads.lock().unwrap(), 2);
}
