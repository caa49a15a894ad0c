//! Repository for the `users` collection.

use chrono::Utc;
use serde_json::json;

use crate::collections::USERS;
use crate::document::{to_fields, DocumentPatch};
use crate::error::StoreResult;
use crate::models::user::EmployeeAccount;
use crate::store::DocumentStore;

/// Employee password records, keyed by PS number.
pub struct UserRepo;

impl UserRepo {
    pub async fn find(
        store: &dyn DocumentStore,
        ps_number: &str,
    ) -> StoreResult<Option<EmployeeAccount>> {
        match store.get(USERS, ps_number).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    /// Create (or replace) the record for `ps_number`.
    pub async fn create(
        store: &dyn DocumentStore,
        ps_number: &str,
        password_hash: &str,
    ) -> StoreResult<EmployeeAccount> {
        let account = EmployeeAccount {
            ps_number: ps_number.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
            password_changed_at: None,
        };
        store.set(USERS, ps_number, to_fields(&account)?).await?;
        Ok(account)
    }

    /// Replace the stored hash. Fails with `NotFound` if the record is absent.
    pub async fn update_password(
        store: &dyn DocumentStore,
        ps_number: &str,
        password_hash: &str,
    ) -> StoreResult<()> {
        let patch = DocumentPatch::new()
            .set("passwordHash", json!(password_hash))
            .set("passwordChangedAt", json!(Utc::now()));
        store.update(USERS, ps_number, patch).await
    }
}
