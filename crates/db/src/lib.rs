//! Persistence layer for the Paddock notification & scheduling engine.
//!
//! - [`models`] — row structs and DTOs, one module per table.
//! - [`store`] — the injected [`store::Store`] trait with its PostgreSQL
//!   and in-memory implementations.
//! - [`error`] — [`StoreError`], the error type every store method returns.
//!
//! Engine components never touch a pool directly; they receive an
//! `Arc<dyn Store>` so tests can substitute [`store::MemoryStore`] for
//! the real database.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use store::{MemoryStore, PgStore, Store};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run all pending migrations from the crate's `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
