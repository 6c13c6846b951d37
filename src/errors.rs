use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Failures raised by the registry client.
///
/// The lookup operations collapse every variant into an empty result list;
/// the `try_*` variants hand them to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No API key is configured; no request was attempted.
    MissingCredential,
    /// DNS failure, timeout, connection reset and similar.
    TransportError(String),
    /// The registry answered with a status other than 200.
    UpstreamError(u16),
    /// A 200 response whose body is not valid JSON.
    DecodeError(String),
}

impl RegistryError {
    /// Short label used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::MissingCredential => "missing_credential",
            RegistryError::TransportError(_) => "transport_error",
            RegistryError::UpstreamError(_) => "upstream_error",
            RegistryError::DecodeError(_) => "decode_error",
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::MissingCredential => write!(f, "API key not configured"),
            RegistryError::TransportError(cause) => write!(f, "Registry request failed: {}", cause),
            RegistryError::UpstreamError(status) => {
                write!(f, "API request failed with code: {}", status)
            }
            RegistryError::DecodeError(cause) => {
                write!(f, "Failed to decode registry response: {}", cause)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Client-facing failure categories of the lookup endpoints.
///
/// Each one resolves to a normal `{success: false, message}` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    InvalidSecurityToken,
    SearchTermTooShort,
    CompanyNumberRequired,
    NoCompaniesFound,
    NoDirectorsFound,
}

impl LookupFailure {
    pub fn message(&self) -> &'static str {
        match self {
            LookupFailure::InvalidSecurityToken => "Invalid security token.",
            LookupFailure::SearchTermTooShort => "Please enter at least 2 characters.",
            LookupFailure::CompanyNumberRequired => "Company number required.",
            LookupFailure::NoCompaniesFound => "No companies found.",
            LookupFailure::NoDirectorsFound => "No directors found.",
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Error interacting with an external API.
    ExternalApiError(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Maps each error variant to an HTTP status code and JSON body.
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                return source.into_response();
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApiError(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, reqwest::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::from(e)),
            context: context.into(),
        })
    }
}
