//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use helpdesk_core::error::CoreError;
use helpdesk_core::roles::ROLE_ADMIN;
use helpdesk_db::repositories::SessionRepo;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token must verify and its session must still be active.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(subject = %user.subject, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Admin username or employee PS number (from `claims.sub`).
    pub subject: String,
    /// `"admin"` or `"employee"`.
    pub role: String,
    /// Session id (from `claims.jti`).
    pub session_id: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        authenticate_token(state, token).await
    }
}

/// Verify a raw access token and its session.
///
/// Shared by the header extractor and the WebSocket handshake, which takes
/// the token from the query string.
pub async fn authenticate_token(state: &AppState, token: &str) -> AppResult<AuthUser> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    if !SessionRepo::is_active(state.store.as_ref(), &claims.jti, Utc::now()).await? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Session has ended".into(),
        )));
    }

    Ok(AuthUser {
        subject: claims.sub,
        role: claims.role,
        session_id: claims.jti,
    })
}
