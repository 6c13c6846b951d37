use crate::config::{Config, Credential};
use crate::errors::RegistryError;
use reqwest::{StatusCode, Url};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Client for the Companies House public data API.
///
/// Every request is a single authenticated GET; retries are left to the caller.
#[derive(Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Credential,
    dispatched: Arc<AtomicU64>,
}

impl RegistryClient {
    /// Creates a new `RegistryClient` from the process configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the base URL, API key and request timeout.
    pub fn new(config: &Config) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.registry_timeout_secs))
            .build()
            .map_err(|e| {
                RegistryError::TransportError(format!("Failed to create registry client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.registry_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            dispatched: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Number of HTTP requests this client (and its clones) has sent.
    pub fn requests_dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Builds `base + /segment/segment...` with each segment percent-encoded.
    fn build_url(&self, path: &[&str], query: &[(&str, &str)]) -> Result<Url, RegistryError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            RegistryError::TransportError(format!("Invalid registry base URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                RegistryError::TransportError("Registry base URL cannot have a path".to_string())
            })?
            .pop_if_empty()
            .extend(path);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Sends an authenticated GET and decodes the JSON body.
    ///
    /// # Arguments
    ///
    /// * `path` - Path segments appended to the base URL, e.g. `["search", "companies"]`.
    /// * `query` - Query parameters; may be empty.
    ///
    /// # Returns
    ///
    /// * `Result<serde_json::Value, RegistryError>` - The decoded body of a 200 response.
    pub async fn request(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, RegistryError> {
        if !self.api_key.is_configured() {
            tracing::warn!("Registry request skipped: API key not configured");
            return Err(RegistryError::MissingCredential);
        }

        let url = self.build_url(path, query)?;
        tracing::debug!("Registry GET {}", url);

        self.dispatched.fetch_add(1, Ordering::Relaxed);

        // Basic auth with the key as username and an empty password
        let response = self
            .client
            .get(url)
            .basic_auth(self.api_key.expose(), Some(""))
            .send()
            .await
            .map_err(|e| RegistryError::TransportError(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!("Registry returned status {}", status);
            return Err(RegistryError::UpstreamError(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::TransportError(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| RegistryError::DecodeError(e.to_string()))
    }
}
