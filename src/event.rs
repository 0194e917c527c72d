use serde::Deserialize;

/// Lifecycle event delivered by the platform event stream.
///
/// Events are immutable once parsed; unknown or missing fields fall back to
/// the non-matching variants so a malformed payload can never trigger a
/// reload on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LifecycleEvent {
    #[serde(rename = "type", default)]
    event_type: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub resource_uri: String,
}

impl LifecycleEvent {
    pub fn new(
        event_type: impl Into<String>,
        state: impl Into<String>,
        parents: Vec<String>,
        resource_uri: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            state: state.into(),
            parents,
            resource_uri: resource_uri.into(),
        }
    }

    /// Parses one JSON event payload.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn kind(&self) -> EventKind {
        EventKind::parse(&self.event_type)
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::parse(&self.state)
    }

    /// Raw `type` string, for log lines.
    pub fn kind_label(&self) -> &str {
        &self.event_type
    }

    /// Raw `state` string, for log lines.
    pub fn state_label(&self) -> &str {
        &self.state
    }
}

/// Resource category carried in the event `type` field (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Container,
    Service,
    Other,
}

impl EventKind {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("container") {
            EventKind::Container
        } else if raw.eq_ignore_ascii_case("service") {
            EventKind::Service
        } else {
            EventKind::Other
        }
    }

    /// True for the resource categories whose lifecycle affects the backend list.
    pub fn is_tracked(self) -> bool {
        matches!(self, EventKind::Container | EventKind::Service)
    }
}

/// Lifecycle state carried in the event `state` field.
///
/// The transient states are mid-transition sub-steps of a scale or redeploy
/// operation; reacting to them would reload the balancer once per sub-step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    InProgress,
    Pending,
    Terminating,
    Starting,
    Scaling,
    Stopping,
    Success,
    /// Terminal state outside the known set (e.g. `Stopped`, `Terminated`).
    Other(String),
    /// Missing or blank state field.
    Unknown,
}

impl LifecycleState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => LifecycleState::Unknown,
            "In progress" => LifecycleState::InProgress,
            "Pending" => LifecycleState::Pending,
            "Terminating" => LifecycleState::Terminating,
            "Starting" => LifecycleState::Starting,
            "Scaling" => LifecycleState::Scaling,
            "Stopping" => LifecycleState::Stopping,
            "Success" => LifecycleState::Success,
            other => LifecycleState::Other(other.to_string()),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LifecycleState::InProgress
                | LifecycleState::Pending
                | LifecycleState::Terminating
                | LifecycleState::Starting
                | LifecycleState::Scaling
                | LifecycleState::Stopping
        )
    }

    /// True when the state names a settled lifecycle step worth reacting to.
    /// A blank state is neither transient nor settled.
    pub fn is_settled(&self) -> bool {
        !self.is_transient() && *self != LifecycleState::Unknown
    }
}
