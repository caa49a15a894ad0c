//! Issued access token record (`sessions/{jti}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One issued token. A token is honoured only while its session record
/// exists, is not revoked and has not expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Username for admins, PS number for employees.
    pub subject: String,
    pub role: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub revoked: bool,
}

/// Input for [`SessionRepo::create`](crate::repositories::SessionRepo::create).
#[derive(Debug, Clone)]
pub struct NewSession {
    pub jti: String,
    pub subject: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}
