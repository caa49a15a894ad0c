pub mod auth;
pub mod health;
pub mod tickets;

use axum::routing::get;
use axum::Router;

use crate::handlers::stream;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                   employee login (public)
/// /auth/admin/login             admin login (public)
/// /auth/logout                  revoke session (requires auth)
/// /auth/password                change own password (requires auth)
///
/// /tickets                      list (admin), create (employee)
/// /tickets/mine                 caller's tickets (employee)
/// /tickets/meta                 priorities, statuses, departments
/// /tickets/{id}                 get (admin or owner), update (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/tickets", tickets::router())
}

/// The long-lived `/tickets/stream` WebSocket upgrade, mounted under
/// `/api/v1` beside [`api_routes`] but outside the request timeout.
///
/// The token travels in the query string because browsers cannot set
/// headers on a WebSocket handshake.
pub fn stream_routes() -> Router<AppState> {
    Router::new().route("/tickets/stream", get(stream::ticket_stream))
}
