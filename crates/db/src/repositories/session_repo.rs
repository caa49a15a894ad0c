//! Repository for the `sessions` collection.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::collections::SESSIONS;
use crate::document::{to_fields, DocumentPatch};
use crate::error::StoreResult;
use crate::models::session::{NewSession, SessionRecord};
use crate::store::DocumentStore;

/// Issued access tokens, keyed by the token's `jti` claim.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &NewSession,
    ) -> StoreResult<SessionRecord> {
        let record = SessionRecord {
            subject: input.subject.clone(),
            role: input.role.clone(),
            issued_at: Utc::now(),
            expires_at: input.expires_at,
            revoked: false,
        };
        store.set(SESSIONS, &input.jti, to_fields(&record)?).await?;
        Ok(record)
    }

    pub async fn find(store: &dyn DocumentStore, jti: &str) -> StoreResult<Option<SessionRecord>> {
        match store.get(SESSIONS, jti).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Whether the session exists, is not revoked and has not expired.
    pub async fn is_active(
        store: &dyn DocumentStore,
        jti: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<bool> {
        Ok(Self::find(store, jti)
            .await?
            .is_some_and(|session| session.is_active(now)))
    }

    /// Mark the session revoked. Fails with `NotFound` if it never existed.
    pub async fn revoke(store: &dyn DocumentStore, jti: &str) -> StoreResult<()> {
        store
            .update(SESSIONS, jti, DocumentPatch::new().set("revoked", json!(true)))
            .await
    }
}
