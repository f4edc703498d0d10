use super::KeyValueStore;
use crate::error::DeckError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, DeckError> {
        self.entries
            .lock()
            .map_err(|e| DeckError::Storage(format!("memory store poisoned: {e}")))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DeckError> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DeckError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DeckError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("user").await.unwrap(), None);
        store.set("user", "a").await.unwrap();
        store.set("user", "b").await.unwrap();
        assert_eq!(store.get("user").await.unwrap().as_deref(), Some("b"));
        assert!(store.contains("user").await.unwrap());
        store.remove("user").await.unwrap();
        store.remove("user").await.unwrap();
        assert!(!store.contains("user").await.unwrap());
    }
}
