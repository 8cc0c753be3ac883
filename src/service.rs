use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::config::{
    default_connect_timeout_secs, default_host, default_port, default_timeout_secs, ClientConfig,
};
use crate::error::ServiceError;

pub(crate) const USER_AGENT: &str = concat!("postal-client/", env!("CARGO_PKG_VERSION"));

/// Client for a Postal server
///
/// Every operation performs a single HTTP round trip. The wrapped
/// [`reqwest::Client`] is reference counted, so cloning a `Service` is cheap
/// and clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Service {
    client: Client,
    host: String,
    port: u16,
}

/// Build the HTTP client used when none is injected
fn create_http_client(timeout_secs: u64, connect_timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .user_agent(USER_AGENT)
        .build()
}

impl Default for Service {
    fn default() -> Self {
        Self::new(default_host(), default_port())
    }
}

impl Service {
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (TLS backend failed to
    /// initialize). Use [`Service::from_config`] to get the error instead.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let client = create_http_client(default_timeout_secs(), default_connect_timeout_secs())
            .expect("Failed to create HTTP client");
        Self::with_client(client, host, port)
    }

    /// Use an existing HTTP client, e.g. one shared with the rest of an
    /// application
    pub fn with_client(client: Client, host: impl Into<String>, port: u16) -> Self {
        Self {
            client,
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        let client = create_http_client(config.timeout_secs, config.connect_timeout_secs)?;
        Ok(Self::with_client(client, config.host.clone(), config.port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Build `http://{host}:{port}/{segments...}`, percent-encoding each
    /// segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let base = format!("http://{}:{}/", self.host, self.port);
        let mut url = Url::parse(&base).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// `/v1/users/{user}/devices/{device_token}`
    pub(crate) fn device_url(&self, user: &str, device_token: &str) -> Result<Url, ServiceError> {
        require("user", user)?;
        require("device_token", device_token)?;
        self.endpoint(&["v1", "users", user, "devices", device_token])
    }

    /// `/v1/users/{user}/devices`
    pub(crate) fn devices_url(&self, user: &str) -> Result<Url, ServiceError> {
        require("user", user)?;
        self.endpoint(&["v1", "users", user, "devices"])
    }

    /// Send a request, turning non-2xx statuses into [`ServiceError::Remote`]
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let response = request.send().await?;

        let status = response.status();
        tracing::debug!(status = %status, url = %response.url(), "Received postal response");

        if !status.is_success() {
            return Err(ServiceError::from_response(response).await);
        }

        Ok(response)
    }

    /// Decode a JSON body. Read failures are transport errors, shape
    /// mismatches are decode errors.
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Identifiers become single path segments: empty ones and the dot segments
/// `.`/`..` (which URL normalization drops) cannot be addressed.
fn require(field: &'static str, value: &str) -> Result<(), ServiceError> {
    if value.is_empty() {
        return Err(ServiceError::MissingField(field));
    }
    if value == "." || value == ".." {
        return Err(ServiceError::DotSegment(field));
    }
    Ok(())
}
