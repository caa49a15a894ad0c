use std::sync::Arc;

use helpdesk_core::ticket::Ticket;
use helpdesk_db::repositories::TicketRepo;
use helpdesk_db::{DocumentStore, StoreResult, Subscription};

use crate::auth::controller::AuthController;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Backing document store.
    pub store: Arc<dyn DocumentStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live view of the `tickets` collection. Every list endpoint reads from
    /// the latest snapshot delivered here.
    pub ticket_feed: Subscription,
}

impl AppState {
    /// Build the state and open the ticket subscription.
    pub async fn new(store: Arc<dyn DocumentStore>, config: ServerConfig) -> StoreResult<Self> {
        let ticket_feed = TicketRepo::subscribe(store.as_ref()).await?;
        Ok(Self {
            store,
            config: Arc::new(config),
            ticket_feed,
        })
    }

    pub fn auth(&self) -> AuthController<'_> {
        AuthController::new(self.store.as_ref(), &self.config.auth)
    }

    /// Decoded tickets from the latest snapshot, in creation order.
    pub fn ticket_snapshot(&self) -> Vec<Ticket> {
        TicketRepo::decode_snapshot(&self.ticket_feed.current())
    }
}
