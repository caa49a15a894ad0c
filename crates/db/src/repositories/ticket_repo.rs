//! Repository for the `tickets` collection.

use helpdesk_core::ticket::{NewTicket, Ticket};
use helpdesk_core::update::TicketUpdate;
use serde_json::json;

use crate::collections::TICKETS;
use crate::document::{to_fields, Document, DocumentPatch};
use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Subscription};

/// Provides create, read and update operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Persist a new ticket under a store-generated id.
    pub async fn create(store: &dyn DocumentStore, input: NewTicket) -> StoreResult<Ticket> {
        let fields = to_fields(&input)?;
        let id = store.add(TICKETS, fields).await?;
        Ok(Ticket::from_new(id, input))
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> StoreResult<Option<Ticket>> {
        match store.get(TICKETS, id).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Overwrite the status and append the comment, if any, in one store
    /// write. Returns the record as stored afterwards.
    pub async fn apply_update(
        store: &dyn DocumentStore,
        id: &str,
        update: &TicketUpdate,
    ) -> StoreResult<Ticket> {
        let mut patch = DocumentPatch::new().set("status", json!(update.status));
        if let Some(comment) = &update.comment {
            patch = patch.append("comments", serde_json::to_value(comment)?);
        }
        store.update(TICKETS, id, patch).await?;

        Self::find_by_id(store, id)
            .await?
            .ok_or_else(|| StoreError::not_found(TICKETS, id))
    }

    pub async fn subscribe(store: &dyn DocumentStore) -> StoreResult<Subscription> {
        store.subscribe(TICKETS).await
    }

    /// Decode a collection snapshot. Documents that are not valid tickets
    /// are skipped.
    pub fn decode_snapshot(docs: &[Document]) -> Vec<Ticket> {
        docs.iter()
            .filter_map(|doc| match doc.decode::<Ticket>() {
                Ok(ticket) => Some(ticket),
                Err(e) => {
                    tracing::warn!(
                        ticket_id = %doc.id,
                        error = %e,
                        "Skipping malformed ticket document"
                    );
                    None
                }
            })
            .collect()
    }
}
