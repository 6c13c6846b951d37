use crate::errors::{AppError, ResultExt};
use crate::models::{
    CompanySummary, Director, ListDirectorsRequest, LookupEnvelope, SearchCompaniesRequest,
    SecurityTokenResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Typed client for the lookup endpoints, as used by the form widget.
#[derive(Clone)]
pub struct LookupClient {
    client: reqwest::Client,
    base_url: String,
    security_token: String,
}

impl LookupClient {
    /// Creates a client that sends an already issued token.
    pub fn with_token(
        base_url: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create lookup client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            security_token: security_token.into(),
        })
    }

    /// Fetches a fresh security token from the server and returns a client using it.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self, AppError> {
        let mut lookup = Self::with_token(base_url, String::new())?;
        let url = format!("{}/api/v1/security-token", lookup.base_url);

        let response = lookup
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to request security token")?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "Security token endpoint returned {}",
                response.status()
            )));
        }

        let issued: SecurityTokenResponse = response
            .json()
            .await
            .context("Failed to parse security token response")?;

        tracing::debug!("Obtained security token for action '{}'", issued.action);
        lookup.security_token = issued.security_token;
        Ok(lookup)
    }

    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<LookupEnvelope<T>, AppError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Lookup endpoint returned {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse lookup response: {}", e))
        })
    }

    pub async fn search_companies(
        &self,
        term: &str,
    ) -> Result<LookupEnvelope<CompanySummary>, AppError> {
        let body = SearchCompaniesRequest {
            security_token: Some(self.security_token.clone()),
            search: Some(term.to_string()),
        };
        self.post("/api/v1/companies/search", &body).await
    }

    pub async fn list_directors(
        &self,
        company_number: &str,
    ) -> Result<LookupEnvelope<Director>, AppError> {
        let body = ListDirectorsRequest {
            security_token: Some(self.security_token.clone()),
            company_number: Some(company_number.to_string()),
        };
        self.post("/api/v1/companies/directors", &body).await
    }
}
