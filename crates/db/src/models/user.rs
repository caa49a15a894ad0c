//! Employee password record (`users/{psNumber}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored employee credentials. The document id is the PS number.
///
/// Contains the password hash -- never serialize this into an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAccount {
    pub ps_number: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub password_changed_at: Option<DateTime<Utc>>,
}
