//! Domain layer of the helpdesk portal.
//!
//! Holds the ticket model, the create/update protocols in their pure form,
//! the query/filter/sort engine and credential validation. Nothing here
//! performs I/O; persistence lives in `helpdesk-db`.

pub mod credentials;
pub mod error;
pub mod query;
pub mod roles;
pub mod ticket;
pub mod types;
pub mod update;
pub mod view;
