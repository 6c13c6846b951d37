use serde::Deserialize;
use std::fmt;

/// Default base URL of the Companies House public data API.
pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://api.company-information.service.gov.uk";

/// The registry API key.
///
/// Debug output never contains the key itself; use [`crate::display::mask_secret`]
/// when a partial rendering is needed.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_configured(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            write!(f, "Credential([REDACTED])")
        } else {
            write!(f, "Credential(<unset>)")
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub api_key: Credential,
    pub registry_base_url: String,
    pub registry_timeout_secs: u64,
    pub token_secret: String,
    pub token_lifetime_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            api_key: Credential::new(
                std::env::var("CH_API_KEY")
                    .map(|key| key.trim().to_string())
                    .unwrap_or_default(),
            ),
            registry_base_url: {
                let url = std::env::var("CH_API_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REGISTRY_BASE_URL.to_string());
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("CH_API_BASE_URL must start with http:// or https://");
                }
                url.trim_end_matches('/').to_string()
            },
            registry_timeout_secs: std::env::var("CH_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CH_REQUEST_TIMEOUT_SECS must be a whole number"))
                .and_then(|secs: u64| {
                    if secs == 0 {
                        anyhow::bail!("CH_REQUEST_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
            token_secret: match std::env::var("CH_TOKEN_SECRET") {
                Ok(secret) if !secret.trim().is_empty() => secret,
                _ => {
                    tracing::warn!(
                        "CH_TOKEN_SECRET not set; generated a per-process secret, tokens will not survive restarts"
                    );
                    uuid::Uuid::new_v4().to_string()
                }
            },
            token_lifetime_secs: std::env::var("CH_TOKEN_LIFETIME_SECS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CH_TOKEN_LIFETIME_SECS must be a whole number"))
                .and_then(|secs: u64| {
                    if secs < 2 {
                        anyhow::bail!("CH_TOKEN_LIFETIME_SECS must be at least 2");
                    }
                    Ok(secs)
                })?,
        };

        // Never log the key itself
        if config.api_key.is_configured() {
            tracing::info!("Companies House API key configured");
        } else {
            tracing::warn!("CH_API_KEY not set; every lookup will return no results");
        }
        tracing::debug!("Registry base URL: {}", config.registry_base_url);
        tracing::debug!("Registry timeout: {}s", config.registry_timeout_secs);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Configuration for tests and tools that talk to a local or mocked registry.
    pub fn for_registry(registry_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            port: 0,
            api_key: Credential::new(api_key),
            registry_base_url: registry_base_url.into(),
            registry_timeout_secs: 30,
            token_secret: "test-secret".to_string(),
            token_lifetime_secs: 86400,
        }
    }
}
