//! Durable key-value storage for client-side state.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for the SQLite backend
//! - `sqlite.rs`: `sqlx`-backed store used by the binary
//! - `memory.rs`: process-local store for tests and throwaway sessions

pub mod memory;
pub mod schema;
pub mod sqlite;

use crate::error::DeckError;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, SqliteStore};

/// String-keyed, string-valued storage. Each call is atomic on its own.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DeckError>;

    /// Insert or overwrite.
    async fn set(&self, key: &str, value: &str) -> Result<(), DeckError>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DeckError>;

    async fn contains(&self, key: &str) -> Result<bool, DeckError> {
        Ok(self.get(key).await?.is_some())
    }
}
