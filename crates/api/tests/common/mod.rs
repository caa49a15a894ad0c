#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use helpdesk_api::auth::jwt::JwtConfig;
use helpdesk_api::config::{AuthPolicy, ServerConfig, StoreBackend};
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_db::{DocumentStore, MemoryStore};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        store: StoreBackend::Memory,
        auth: AuthPolicy::default(),
    }
}

/// Build application state over a fresh in-memory store.
pub async fn build_test_state() -> AppState {
    build_state_with(Arc::new(MemoryStore::new()), test_config()).await
}

pub async fn build_state_with(store: Arc<dyn DocumentStore>, config: ServerConfig) -> AppState {
    AppState::new(store, config)
        .await
        .expect("test state should build")
}

/// Build the full application router with all middleware layers over a
/// fresh in-memory store.
pub async fn build_test_app() -> Router {
    let state = build_test_state().await;
    let config = test_config();
    build_app_router(state, &config)
}

/// Build the router for an existing state.
pub fn app_for(state: AppState) -> Router {
    let config = (*state.config).clone();
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Session helpers
// ---------------------------------------------------------------------------

/// Log in an employee with the default first-login password and return the
/// access token.
pub async fn employee_token(app: &Router, ps_number: &str) -> String {
    let body = json!({ "psNumber": ps_number, "password": "123456" });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Log in with the seeded admin credentials and return the access token.
pub async fn admin_token(app: &Router) -> String {
    let body = json!({ "username": "admin", "password": "admin123" });
    let response = post_json(app.clone(), "/api/v1/auth/admin/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["accessToken"]
        .as_str()
        .unwrap()
        .to_string()
}

/// File a ticket as the given employee and return the stored ticket JSON.
pub async fn create_ticket(app: &Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app.clone(), "/api/v1/tickets", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
