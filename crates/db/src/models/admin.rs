//! Singleton admin credential record (`settings/admin`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored admin credential pair. Exactly one exists once the service has
/// seeded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub updated_at: DateTime<Utc>,
}
