//! Route definitions for the `/tickets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`. The live stream lives in
/// [`super::stream_routes`].
///
/// ```text
/// GET  /          -> list_tickets (admin)
/// POST /          -> create_ticket (employee)
/// GET  /mine      -> my_tickets (employee)
/// GET  /meta      -> ticket_meta
/// GET  /{id}      -> get_ticket (admin or owner)
/// PUT  /{id}      -> update_ticket (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(tickets::list_tickets).post(tickets::create_ticket),
        )
        .route("/mine", get(tickets::my_tickets))
        .route("/meta", get(tickets::ticket_meta))
        .route(
            "/{id}",
            get(tickets::get_ticket).put(tickets::update_ticket),
        )
}
