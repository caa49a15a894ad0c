//! Well-known role name constants.
//!
//! These are embedded in access-token claims and session documents.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYEE: &str = "employee";
