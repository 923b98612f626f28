// ABOUTME: Data layer for Storefront
// ABOUTME: SQLite-backed document store, migrations, and shared storage errors

pub mod database;
pub mod error;

pub use database::Database;
pub use error::{is_unique_violation, StorageError, StorageResult};

// Re-export the pool type so storage packages don't each pin sqlx types
pub use sqlx::SqlitePool;
