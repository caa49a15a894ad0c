//! Collection names used in the document store.

/// `tickets/{id}` -- one document per support ticket.
pub const TICKETS: &str = "tickets";

/// `users/{psNumber}` -- employee password records.
pub const USERS: &str = "users";

/// `settings/{name}` -- singleton configuration documents.
pub const SETTINGS: &str = "settings";

/// `sessions/{jti}` -- issued access tokens.
pub const SESSIONS: &str = "sessions";

/// Id of the admin credential document inside [`SETTINGS`].
pub const ADMIN_CREDENTIALS_ID: &str = "admin";
