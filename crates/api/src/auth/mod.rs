//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`controller`] -- employee and admin login plus password changes.

pub mod controller;
pub mod jwt;
pub mod password;
