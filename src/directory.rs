use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use thiserror::Error;

/// Service object returned by the platform directory API, reduced to the
/// link topology the agent cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceRecord {
    #[serde(default)]
    pub linked_to_service: Vec<ServiceLink>,
}

impl ServiceRecord {
    /// Endpoint identifiers of every linked service, in response order.
    pub fn endpoints(&self) -> Vec<String> {
        self.linked_to_service
            .iter()
            .map(|link| link.to_service.clone())
            .collect()
    }
}

/// One link edge from the balancer service to a backend service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceLink {
    pub to_service: String,
}

/// Resolves a resource URI to its current service object.
pub trait Directory {
    fn fetch(&mut self, resource_uri: &str) -> Result<ServiceRecord, DirectoryError>;
}

/// Errors surfaced by directory lookups. Callers treat these as "no new
/// information", never as fatal.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Request(String),
    #[error("directory returned status {0}")]
    Status(u16),
    #[error("directory response decode failed: {0}")]
    Decode(String),
}

/// Blocking HTTP directory client against the platform REST API.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: String,
    auth: String,
}

impl HttpDirectory {
    /// Creates a client targeting the provided API base URL, authenticating
    /// every request with the given `Authorization` header value.
    pub fn new(
        base_url: impl Into<String>,
        auth: impl Into<String>,
    ) -> Result<Self, DirectoryError> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(DirectoryError::Request(
                "directory base URL must not be empty".to_string(),
            ));
        }
        let client = Client::builder()
            .build()
            .map_err(|err| DirectoryError::Request(format!("http client build failed: {err}")))?;
        Ok(Self {
            client,
            base_url,
            auth: auth.into(),
        })
    }

    fn object_url(&self, resource_uri: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource_uri.trim_start_matches('/')
        )
    }
}

impl Directory for HttpDirectory {
    fn fetch(&mut self, resource_uri: &str) -> Result<ServiceRecord, DirectoryError> {
        let response = self
            .client
            .get(self.object_url(resource_uri))
            .header(AUTHORIZATION, &self.auth)
            .send()
            .map_err(|err| DirectoryError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(DirectoryError::Status(response.status().as_u16()));
        }
        response
            .json::<ServiceRecord>()
            .map_err(|err| DirectoryError::Decode(err.to_string()))
    }
}
