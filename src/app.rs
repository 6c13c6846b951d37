use crate::config::Config;
use crate::errors::AppError;
use crate::handlers::{self, AppState};
use crate::models::{
    CompanyEnvelope, CompanySummary, Director, DirectorEnvelope, ListDirectorsRequest,
    SearchCompaniesRequest, SecurityTokenResponse,
};
use crate::registry_client::RegistryClient;
use crate::security::SecurityTokens;
use crate::services::LookupService;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;

/// Lookup requests are tiny; anything larger is refused before parsing.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::issue_security_token,
        handlers::search_companies,
        handlers::list_directors,
        handlers::display_setting
    ),
    components(schemas(
        CompanySummary,
        Director,
        CompanyEnvelope,
        DirectorEnvelope,
        SearchCompaniesRequest,
        ListDirectorsRequest,
        SecurityTokenResponse
    )),
    info(title = "Companies House Lookup API")
)]
pub struct ApiDoc;

/// Builds the shared state from configuration.
///
/// # Returns
///
/// * `anyhow::Result<Arc<AppState>>` - The state, or an error if the HTTP client cannot be built.
pub fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let registry = RegistryClient::new(&config)?;
    let tokens = SecurityTokens::new(config.token_secret.clone(), config.token_lifetime_secs);

    Ok(Arc::new(AppState {
        config,
        lookup: LookupService::new(registry),
        tokens,
    }))
}

/// Serves the generated OpenAPI document.
async fn serve_openapi_spec() -> Result<impl IntoResponse, AppError> {
    let spec = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|e| AppError::InternalError(format!("Failed to render OpenAPI spec: {}", e)))?;

    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        spec,
    ))
}

/// Serves the Swagger UI HTML page, configured to load `serve_openapi_spec`.
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Companies House Lookup - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

/// Routes of the lookup endpoints, without state attached.
///
/// `main` wraps these in the per-IP rate limiter before merging.
pub fn lookup_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/security-token", get(handlers::issue_security_token))
        .route("/api/v1/companies/search", post(handlers::search_companies))
        .route("/api/v1/companies/directors", post(handlers::list_directors))
        .route("/api/v1/settings/display", get(handlers::display_setting))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
}

/// Assembles the full application around the given lookup routes.
pub fn build_router(state: Arc<AppState>, lookup_routes: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.json", get(serve_openapi_spec))
        .merge(lookup_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// The application without rate limiting; used by tests and local tools.
pub fn router(state: Arc<AppState>) -> Router {
    build_router(state, lookup_routes())
}
