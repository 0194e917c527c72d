use crate::directory::{Directory, DirectoryError};
use crate::event::{LifecycleEvent, LifecycleState};
use crate::registry::{LinkDiff, LinkedServiceRegistry};

/// Outcome of classifying one lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Neither rule matched; nothing to do.
    Ignore,
    /// A tracked backend settled into a new state; refresh the backend list.
    ReloadOnly,
    /// The link topology changed; adopt the new endpoint set, then reload.
    UpdateAndReload {
        endpoints: Vec<String>,
        diff: LinkDiff,
    },
}

/// Classification result. A directory failure downgrades the topology rule
/// to no-op for this event but is reported so the loop can log it.
#[derive(Debug)]
pub struct Classification {
    pub verdict: Verdict,
    pub directory_error: Option<DirectoryError>,
}

/// Decides whether a lifecycle event warrants a balancer reload.
///
/// Two independent rules run on every event:
/// 1. a tracked backend (parents intersect the linked set) settled into a
///    non-transient state;
/// 2. the balancer service itself (`service_uri` among the parents) reported
///    `Success`, in which case the authoritative linked-service list is
///    refetched and diffed against the registry.
///
/// Whichever rules fire, at most one reload is requested per event.
pub struct Classifier {
    service_uri: String,
    directory: Box<dyn Directory>,
}

impl Classifier {
    pub fn new(service_uri: impl Into<String>, directory: Box<dyn Directory>) -> Self {
        Self {
            service_uri: service_uri.into(),
            directory,
        }
    }

    pub fn service_uri(&self) -> &str {
        &self.service_uri
    }

    pub fn classify(
        &mut self,
        event: &LifecycleEvent,
        linked: &LinkedServiceRegistry,
    ) -> Classification {
        let backend_settled = backend_settled(event, linked);

        let mut topology_change = None;
        let mut directory_error = None;
        if event.state() == LifecycleState::Success
            && event.parents.iter().any(|parent| parent == &self.service_uri)
        {
            match self.directory.fetch(&self.service_uri) {
                Ok(record) => {
                    let endpoints = record.endpoints();
                    let diff = linked.diff(&endpoints);
                    if !diff.is_empty() {
                        topology_change = Some((endpoints, diff));
                    }
                }
                Err(err) => directory_error = Some(err),
            }
        }

        let verdict = match topology_change {
            Some((endpoints, diff)) => Verdict::UpdateAndReload { endpoints, diff },
            None if backend_settled => Verdict::ReloadOnly,
            None => Verdict::Ignore,
        };
        Classification {
            verdict,
            directory_error,
        }
    }
}

/// Rule 1: a container or service among the tracked backends reached a
/// settled (non-transient, non-blank) state.
fn backend_settled(event: &LifecycleEvent, linked: &LinkedServiceRegistry) -> bool {
    event.kind().is_tracked() && event.state().is_settled() && linked.contains_any(&event.parents)
}
