//! Repository for the admin credential document (`settings/admin`).

use chrono::Utc;

use crate::collections::{ADMIN_CREDENTIALS_ID, SETTINGS};
use crate::document::to_fields;
use crate::error::StoreResult;
use crate::models::admin::AdminCredentialRecord;
use crate::store::DocumentStore;

pub struct AdminCredentialRepo;

impl AdminCredentialRepo {
    pub async fn get(store: &dyn DocumentStore) -> StoreResult<Option<AdminCredentialRecord>> {
        match store.get(SETTINGS, ADMIN_CREDENTIALS_ID).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Write the credential pair, replacing any existing one.
    pub async fn put(
        store: &dyn DocumentStore,
        username: &str,
        password_hash: &str,
    ) -> StoreResult<AdminCredentialRecord> {
        let record = AdminCredentialRecord {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            updated_at: Utc::now(),
        };
        store
            .set(SETTINGS, ADMIN_CREDENTIALS_ID, to_fields(&record)?)
            .await?;
        Ok(record)
    }
}
