//! Typed records stored in the non-ticket collections.

pub mod admin;
pub mod session;
pub mod user;
