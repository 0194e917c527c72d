/// Environment facts resolved once at process start and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapFacts {
    /// Resource URI of the container this agent runs in, when scheduled by
    /// the platform.
    pub container_uri: Option<String>,
    /// Resource URI of the balancer's own service.
    pub service_uri: Option<String>,
    /// Whether platform API credentials are present.
    pub has_api_auth: bool,
}

impl BootstrapFacts {
    /// True when the agent runs inside the platform with a service identity.
    pub fn in_platform(&self) -> bool {
        self.container_uri.is_some() && self.service_uri.is_some()
    }

    /// True when all three identity facts hold: in-platform, service
    /// identity, and API credentials.
    pub fn fully_provisioned(&self) -> bool {
        self.in_platform() && self.has_api_auth
    }
}

/// Operating mode, selected exactly once from the bootstrap facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Event stream plus watchdog; does not return in normal operation.
    Reactive,
    /// Inside the platform but without API credentials: reload once and
    /// warn that automatic reconfiguration is unavailable.
    OneShotNoApi,
    /// Outside the platform: reload once and exit.
    OneShotOutsidePlatform,
}

impl RunMode {
    pub fn decide(facts: &BootstrapFacts) -> RunMode {
        if facts.fully_provisioned() {
            RunMode::Reactive
        } else if facts.in_platform() {
            RunMode::OneShotNoApi
        } else {
            RunMode::OneShotOutsidePlatform
        }
    }
}
