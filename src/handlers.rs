use crate::config::Config;
use crate::display::render_setting_display;
use crate::errors::LookupFailure;
use crate::models::*;
use crate::sanitize::sanitize_text_field;
use crate::security::{SecurityTokens, LOOKUP_ACTION};
use crate::services::LookupService;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Minimum number of characters a search term needs after sanitization.
pub const MIN_SEARCH_LEN: usize = 2;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Company and director lookups.
    pub lookup: LookupService,
    /// Issues and verifies the tokens the front end echoes back.
    pub tokens: SecurityTokens,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "companies-house-lookup",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /api/v1/security-token
///
/// Issues the token the front end must send with every lookup request.
#[utoipa::path(
    get,
    path = "/api/v1/security-token",
    responses((status = 200, description = "Token for the lookup endpoints", body = SecurityTokenResponse))
)]
pub async fn issue_security_token(
    State(state): State<Arc<AppState>>,
) -> Json<SecurityTokenResponse> {
    Json(SecurityTokenResponse {
        security_token: state.tokens.issue(LOOKUP_ACTION),
        action: LOOKUP_ACTION.to_string(),
        valid_for_secs: state.tokens.guaranteed_validity_secs(),
    })
}

fn verify_security_token(state: &AppState, token: Option<&str>) -> Result<(), LookupFailure> {
    match token {
        Some(token) if state.tokens.verify(token, LOOKUP_ACTION) => Ok(()),
        Some(_) => {
            tracing::warn!("Rejected lookup request: invalid security token");
            Err(LookupFailure::InvalidSecurityToken)
        }
        None => {
            tracing::warn!("Rejected lookup request: missing security token");
            Err(LookupFailure::InvalidSecurityToken)
        }
    }
}

/// POST /api/v1/companies/search
///
/// Looks up companies whose name starts with the submitted term.
/// A missing or unreadable body is handled like an empty one.
#[utoipa::path(
    post,
    path = "/api/v1/companies/search",
    request_body = SearchCompaniesRequest,
    responses((status = 200, description = "Lookup envelope", body = CompanyEnvelope))
)]
pub async fn search_companies(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<SearchCompaniesRequest>>,
) -> Json<LookupEnvelope<CompanySummary>> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    if let Err(failure) = verify_security_token(&state, request.security_token.as_deref()) {
        return Json(LookupEnvelope::failure(failure.message()));
    }

    let term = sanitize_text_field(request.search.as_deref().unwrap_or_default());
    if term.chars().count() < MIN_SEARCH_LEN {
        return Json(LookupEnvelope::failure(
            LookupFailure::SearchTermTooShort.message(),
        ));
    }

    tracing::info!("POST /companies/search - term: {}", term);

    // Registry failures read as "no results" to the caller; only the log keeps the reason
    let companies = state.lookup.search_companies(&term).await;

    if companies.is_empty() {
        return Json(LookupEnvelope::failure(
            LookupFailure::NoCompaniesFound.message(),
        ));
    }

    Json(LookupEnvelope::success(companies))
}

/// POST /api/v1/companies/directors
///
/// Lists the directors of the selected company.
#[utoipa::path(
    post,
    path = "/api/v1/companies/directors",
    request_body = ListDirectorsRequest,
    responses((status = 200, description = "Lookup envelope", body = DirectorEnvelope))
)]
pub async fn list_directors(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<ListDirectorsRequest>>,
) -> Json<LookupEnvelope<Director>> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();

    if let Err(failure) = verify_security_token(&state, request.security_token.as_deref()) {
        return Json(LookupEnvelope::failure(failure.message()));
    }

    let company_number = sanitize_text_field(request.company_number.as_deref().unwrap_or_default());
    if company_number.is_empty() {
        return Json(LookupEnvelope::failure(
            LookupFailure::CompanyNumberRequired.message(),
        ));
    }

    tracing::info!("POST /companies/directors - company: {}", company_number);

    let directors = state.lookup.list_directors(&company_number).await;

    if directors.is_empty() {
        return Json(LookupEnvelope::failure(
            LookupFailure::NoDirectorsFound.message(),
        ));
    }

    Json(LookupEnvelope::success(directors))
}

/// GET /api/v1/settings/display
///
/// Renders the configured API key, masked, as an HTML fragment.
#[utoipa::path(
    get,
    path = "/api/v1/settings/display",
    params(DisplayQuery),
    responses((status = 200, description = "Masked key markup", content_type = "text/html", body = String))
)]
pub async fn display_setting(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DisplayQuery>,
) -> Html<String> {
    Html(render_setting_display(
        &state.config.api_key,
        query.label.as_deref(),
    ))
}
