//! Tests for `AppError` → HTTP response mapping.
//!
//! Most tests call `IntoResponse` directly on `AppError` values. The last
//! group drives the router over a store whose ticket writes fail, to check
//! that backend failures surface as `STORE_ERROR` without leaking details.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::json;

use helpdesk_api::error::AppError;
use helpdesk_core::error::{AuthError, CoreError};
use helpdesk_core::ticket::{build_ticket, NewTicketForm};
use helpdesk_core::types::now_millis;
use helpdesk_db::collections::TICKETS;
use helpdesk_db::document::to_fields;
use helpdesk_db::repositories::TicketRepo;
use helpdesk_db::{
    Document, DocumentPatch, DocumentStore, Fields, MemoryStore, StoreError, StoreResult,
    Subscription,
};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Core errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Ticket",
        id: "abc".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Ticket with id abc not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Missing or invalid field(s): email".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Missing or invalid field(s): email");
}

#[tokio::test]
async fn forbidden_and_unauthorized_keep_their_messages() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Forbidden(
        "Admin role required".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "Admin role required");

    let (status, json) = error_to_response(AppError::Core(CoreError::Unauthorized(
        "Session has ended".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("argon2 exploded: salt=xyz".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Auth errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auth_errors_map_to_distinct_codes() {
    let cases = [
        (
            AuthError::InvalidPassword,
            StatusCode::UNAUTHORIZED,
            "INVALID_PASSWORD",
            "Invalid password",
        ),
        (AuthError::UserNotFound, StatusCode::UNAUTHORIZED, "USER_NOT_FOUND", "User not found"),
        (
            AuthError::InvalidCredentials,
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid credentials",
        ),
        (AuthError::WrongPassword, StatusCode::FORBIDDEN, "WRONG_PASSWORD", "Wrong password"),
    ];

    for (err, expected_status, expected_code, expected_message) in cases {
        let (status, json) = error_to_response(AppError::from(err)).await;
        assert_eq!(status, expected_status, "{err:?}");
        assert_eq!(json["code"], expected_code);
        assert_eq!(json["error"], expected_message);
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_not_found_returns_404() {
    let err = AppError::Store(StoreError::not_found("tickets", "t1"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "tickets/t1 not found");
}

#[tokio::test]
async fn non_object_record_is_internal_error() {
    let err = AppError::Store(to_fields(&42).unwrap_err());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn store_unavailable_returns_503_without_details() {
    let err = AppError::Store(StoreError::Unavailable("connection refused to 10.0.0.5".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "STORE_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("10.0.0.5"));
}

// ---------------------------------------------------------------------------
// Failing backend through the router
// ---------------------------------------------------------------------------

/// Delegates to an in-memory store but rejects every ticket write.
struct TicketWritesFail {
    inner: MemoryStore,
}

impl TicketWritesFail {
    fn check(collection: &str) -> StoreResult<()> {
        if collection == TICKETS {
            return Err(StoreError::Unavailable("ticket writes disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for TicketWritesFail {
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        Self::check(collection)?;
        self.inner.add(collection, fields).await
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        Self::check(collection)?;
        self.inner.set(collection, id, fields).await
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentPatch) -> StoreResult<()> {
        Self::check(collection)?;
        self.inner.update(collection, id, patch).await
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.inner.list(collection).await
    }

    async fn subscribe(&self, collection: &str) -> StoreResult<Subscription> {
        self.inner.subscribe(collection).await
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Unavailable("ping disabled".into()))
    }
}

async fn failing_app() -> axum::Router {
    failing_app_over(MemoryStore::new()).await
}

/// Router over `inner` with ticket writes disabled from here on.
async fn failing_app_over(inner: MemoryStore) -> axum::Router {
    let store = Arc::new(TicketWritesFail { inner });
    let state = common::build_state_with(store, common::test_config()).await;
    state.auth().ensure_admin_seeded().await.unwrap();
    common::app_for(state)
}

#[tokio::test]
async fn failed_ticket_create_is_store_error() {
    let app = failing_app().await;
    let token = common::employee_token(&app, "PS1001").await;

    let body = json!({ "email": "a@b.c", "subject": "Printer" });
    let response = common::post_json_auth(app.clone(), "/api/v1/tickets", body, &token).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "STORE_ERROR");
    assert_eq!(json["error"], "The ticket store is unavailable, please try again");

    // Nothing was written.
    let mine = common::body_json(common::get_auth(app, "/api/v1/tickets/mine", &token).await).await;
    assert!(mine["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_store_reports_degraded_health() {
    let app = failing_app().await;

    let response = common::get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store_healthy"], false);
}

#[tokio::test]
async fn failed_ticket_update_leaves_ticket_unchanged() {
    let inner = MemoryStore::new();
    let form = NewTicketForm {
        email: "a@b.c".into(),
        subject: "Printer".into(),
        ..Default::default()
    };
    let seeded = TicketRepo::create(&inner, build_ticket("PS1001", &form, now_millis()).unwrap())
        .await
        .unwrap();

    let app = failing_app_over(inner).await;
    let admin = common::admin_token(&app).await;

    let uri = format!("/api/v1/tickets/{}", seeded.id);
    let body = json!({ "status": "Resolved", "comment": "Replaced the toner" });
    let response = common::put_json_auth(app.clone(), &uri, body, &admin).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(common::body_json(response).await["code"], "STORE_ERROR");

    let list = common::get_auth(app.clone(), "/api/v1/tickets", &admin).await;
    let list = common::body_json(list).await;
    let listed = &list["data"][0];
    assert_eq!(listed["status"], "Open");
    assert_eq!(listed["comments"].as_array().unwrap().len(), 1);

    let single = common::body_json(common::get_auth(app, &uri, &admin).await).await;
    assert_eq!(single["data"]["status"], "Open");
    assert_eq!(single["data"]["comments"].as_array().unwrap().len(), 1);
}
