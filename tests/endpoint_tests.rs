/// Endpoint tests driving the router in-process
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use companies_house_lookup::app::{build_state, router};
use companies_house_lookup::config::Config;
use companies_house_lookup::handlers::AppState;
use companies_house_lookup::security::LOOKUP_ACTION;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app(registry_base_url: String, api_key: &str) -> (Router, Arc<AppState>) {
    let state = build_state(Config::for_registry(registry_base_url, api_key)).unwrap();
    (router(Arc::clone(&state)), state)
}

fn valid_token(state: &AppState) -> String {
    state.tokens.issue(LOOKUP_ACTION)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "test_key");
    let (status, body) = get_text(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_search_rejects_invalid_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, _) = test_app(mock_server.uri(), "test_key");
    let (status, body) = post_json(
        app,
        "/api/v1/companies/search",
        json!({"securityToken": "not-a-token", "search": "Acme"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": false, "message": "Invalid security token."})
    );
}

#[tokio::test]
async fn test_search_missing_body_is_invalid_token() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "test_key");
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/companies/search")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Invalid security token.");
}

#[tokio::test]
async fn test_search_term_too_short_skips_registry() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(mock_server.uri(), "test_key");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/search",
        json!({"securityToken": valid_token(&state), "search": " <i>A</i> "}),
    )
    .await;

    assert_eq!(
        body,
        json!({"success": false, "message": "Please enter at least 2 characters."})
    );
    assert_eq!(state.lookup.registry().requests_dispatched(), 0);
}

#[tokio::test]
async fn test_search_returns_matches() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/companies"))
        .and(query_param("q", "Acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"title": "Acme Ltd", "company_number": "123", "company_status": "active",
                 "address_snippet": "1 High St", "date_of_creation": "2001-02-03"},
                {"title": "Other Co", "company_number": "456"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(mock_server.uri(), "test_key");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/search",
        json!({"nonce": valid_token(&state), "search": "Acme"}),
    )
    .await;

    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["companyName"], "Acme Ltd");
    assert_eq!(data[0]["companyNumber"], "123");
    assert_eq!(data[0]["addressSnippet"], "1 High St");
    assert_eq!(data[0]["dateOfCreation"], "2001-02-03");
}

#[tokio::test]
async fn test_search_upstream_failure_reads_as_no_results() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(mock_server.uri(), "test_key");
    let (status, body) = post_json(
        app,
        "/api/v1/companies/search",
        json!({"securityToken": valid_token(&state), "search": "Acme"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": false, "message": "No companies found."})
    );
}

#[tokio::test]
async fn test_search_without_api_key_reads_as_no_results() {
    let (app, state) = test_app("http://127.0.0.1:9".to_string(), "");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/search",
        json!({"securityToken": valid_token(&state), "search": "Acme"}),
    )
    .await;

    assert_eq!(body["message"], "No companies found.");
    assert_eq!(state.lookup.registry().requests_dispatched(), 0);
}

#[tokio::test]
async fn test_directors_requires_company_number() {
    let (app, state) = test_app("http://127.0.0.1:9".to_string(), "test_key");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/directors",
        json!({"securityToken": valid_token(&state), "companyNumber": "  "}),
    )
    .await;

    assert_eq!(
        body,
        json!({"success": false, "message": "Company number required."})
    );
}

#[tokio::test]
async fn test_directors_rejects_invalid_token() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "test_key");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/directors",
        json!({"companyNumber": "123"}),
    )
    .await;

    assert_eq!(body["message"], "Invalid security token.");
}

#[tokio::test]
async fn test_directors_returns_director_roles() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/123/officers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"name": "Jane Doe", "officer_role": "Director", "appointed_on": "2020-01-01"},
                {"name": "Bob", "officer_role": "Secretary"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(mock_server.uri(), "test_key");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/directors",
        json!({"securityToken": valid_token(&state), "companyNumber": "123"}),
    )
    .await;

    assert_eq!(body["success"], true);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Jane Doe");
    assert_eq!(data[0]["role"], "Director");
}

#[tokio::test]
async fn test_directors_none_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/company/123/officers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "Bob", "officer_role": "Secretary"}]
        })))
        .mount(&mock_server)
        .await;

    let (app, state) = test_app(mock_server.uri(), "test_key");
    let (_, body) = post_json(
        app,
        "/api/v1/companies/directors",
        json!({"securityToken": valid_token(&state), "companyNumber": "123"}),
    )
    .await;

    assert_eq!(
        body,
        json!({"success": false, "message": "No directors found."})
    );
}

#[tokio::test]
async fn test_issued_token_is_accepted() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"title": "Acme Ltd", "company_number": "1"}]
        })))
        .mount(&mock_server)
        .await;

    let (app, _) = test_app(mock_server.uri(), "test_key");
    let (status, body) = get_text(app.clone(), "/api/v1/security-token").await;
    assert_eq!(status, StatusCode::OK);

    let issued: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(issued["action"], LOOKUP_ACTION);

    let (_, body) = post_json(
        app,
        "/api/v1/companies/search",
        json!({"securityToken": issued["securityToken"], "search": "Acme"}),
    )
    .await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_display_setting_masks_key() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "abcdefgh12345678wxyz");
    let (status, html) = get_text(app, "/api/v1/settings/display?label=API%20Key").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("abcdefgh****wxyz"));
    assert!(html.contains("API Key"));
    assert!(!html.contains("abcdefgh12345678wxyz"));
}

#[tokio::test]
async fn test_display_setting_without_key() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "");
    let (_, html) = get_text(app, "/api/v1/settings/display").await;

    assert_eq!(html, "<p>No API key configured.</p>");
}

#[tokio::test]
async fn test_openapi_lists_lookup_paths() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "test_key");
    let (status, body) = get_text(app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert!(doc["paths"]["/api/v1/companies/search"].is_object());
    assert!(doc["paths"]["/api/v1/companies/directors"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = test_app("http://127.0.0.1:9".to_string(), "test_key");
    let (status, _) = get_text(app, "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
