//! Ticket store client.
//!
//! [`DocumentStore`] is the only capability the rest of the system needs from
//! the backing database. Two implementations are provided:
//!
//! - [`MemoryStore`] -- process-local, used in development and tests.
//! - [`PgDocumentStore`] -- PostgreSQL `documents` table with JSONB bodies.
//!
//! Typed access to the individual collections goes through the zero-sized
//! repositories in [`repositories`].

use sqlx::postgres::PgPoolOptions;

pub mod collections;
pub mod document;
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use document::{Document, DocumentPatch, Fields};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use store::{DocumentStore, Snapshot, Subscription};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
