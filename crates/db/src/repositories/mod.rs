//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&dyn DocumentStore` as the first argument.

pub mod admin_credential_repo;
pub mod session_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use admin_credential_repo::AdminCredentialRepo;
pub use session_repo::SessionRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
