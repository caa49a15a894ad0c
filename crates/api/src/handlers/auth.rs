//! Handlers for the `/auth` resource (login, admin login, logout, password).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use helpdesk_core::credentials::{AdminCredentials, PasswordChangeForm};
use helpdesk_core::roles::{ROLE_ADMIN, ROLE_EMPLOYEE};
use helpdesk_db::models::session::NewSession;
use helpdesk_db::repositories::SessionRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub ps_number: String,
    pub password: String,
}

/// Successful authentication response returned by both login endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Admin username or employee PS number.
    pub subject: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Employee login by PS number.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let account = state.auth().login_user(&input.ps_number, &input.password).await?;
    let response = issue_session(&state, &account.ps_number, ROLE_EMPLOYEE).await?;
    tracing::info!(ps_number = %account.ps_number, "Employee logged in");
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(input): Json<AdminCredentials>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    state.auth().login_admin(&input).await?;
    let response = issue_session(&state, &input.username, ROLE_ADMIN).await?;
    tracing::info!(username = %input.username, "Admin logged in");
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke the caller's session. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke(state.store.as_ref(), &user.session_id).await?;
    tracing::info!(subject = %user.subject, role = %user.role, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/auth/password
///
/// Change the password of whoever is calling: the admin credential pair for
/// admin tokens, the employee's own record otherwise. Returns 204 No Content.
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<PasswordChangeForm>,
) -> AppResult<StatusCode> {
    let auth = state.auth();
    if user.is_admin() {
        auth.change_admin_password(&form).await?;
    } else {
        auth.change_user_password(&user.subject, &form).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate an access token, record its session and build the response.
async fn issue_session(state: &AppState, subject: &str, role: &str) -> AppResult<AuthResponse> {
    let (access_token, claims) = generate_access_token(subject, role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AppError::InternalError("Token expiry out of range".into()))?;

    let session = NewSession {
        jti: claims.jti,
        subject: subject.to_string(),
        role: role.to_string(),
        expires_at,
    };
    SessionRepo::create(state.store.as_ref(), &session).await?;

    Ok(AuthResponse {
        access_token,
        expires_in: claims.exp - claims.iat,
        subject: subject.to_string(),
        role: role.to_string(),
    })
}
