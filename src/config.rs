use crate::bootstrap::BootstrapFacts;
use crate::logging::LogLevel;
use std::env;
use thiserror::Error;

/// `Authorization` header value for platform API calls.
pub const ENV_API_AUTH: &str = "PLATFORM_API_AUTH";
/// Resource URI of the container this agent was scheduled into.
pub const ENV_CONTAINER_URI: &str = "PLATFORM_CONTAINER_URI";
/// Resource URI of the balancer's own service.
pub const ENV_SERVICE_URI: &str = "PLATFORM_SERVICE_URI";
/// Base URL of the platform REST API.
pub const ENV_API_URL: &str = "PLATFORM_API_URL";
/// URL of the lifecycle event stream; defaults to `<api-url>/events`.
pub const ENV_EVENTS_URL: &str = "PLATFORM_EVENTS_URL";
/// Command regenerating the balancer config and reloading the process.
pub const ENV_RELOAD_COMMAND: &str = "RELOAD_COMMAND";
/// Truthy value enables debug logging.
pub const ENV_DEBUG: &str = "DEBUG";

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_RELOAD_COMMAND: &str = "reload-balancer";

/// Process configuration resolved once from the environment at start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentConfig {
    pub container_uri: Option<String>,
    pub service_uri: Option<String>,
    pub api_auth: Option<String>,
    pub api_url: String,
    pub events_url: String,
    pub reload_command: Vec<String>,
    pub debug: bool,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup, which is
    /// how tests exercise parsing without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let api_url = get(ENV_API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let events_url = get(ENV_EVENTS_URL)
            .unwrap_or_else(|| format!("{}/events", api_url.trim_end_matches('/')));
        let reload_raw =
            get(ENV_RELOAD_COMMAND).unwrap_or_else(|| DEFAULT_RELOAD_COMMAND.to_string());
        let reload_command: Vec<String> = reload_raw
            .split_whitespace()
            .map(|token| token.to_string())
            .collect();
        if reload_command.is_empty() {
            return Err(ConfigError::EmptyReloadCommand);
        }
        Ok(Self {
            container_uri: get(ENV_CONTAINER_URI),
            service_uri: get(ENV_SERVICE_URI),
            api_auth: get(ENV_API_AUTH),
            api_url,
            events_url,
            reload_command,
            debug: get(ENV_DEBUG).map(|value| truthy(&value)).unwrap_or(false),
        })
    }

    /// The three bootstrap identity facts derived from this configuration.
    pub fn bootstrap_facts(&self) -> BootstrapFacts {
        BootstrapFacts {
            container_uri: self.container_uri.clone(),
            service_uri: self.service_uri.clone(),
            has_api_auth: self.api_auth.is_some(),
        }
    }

    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

fn truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no"
    )
}

/// Errors surfaced while resolving the process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reload command must not be empty")]
    EmptyReloadCommand,
}
