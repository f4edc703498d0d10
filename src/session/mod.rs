//! Persisted "who is logged in" record.

use crate::storage::KeyValueStore;
use crate::types::User;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fixed storage key for the serialized current user.
pub const SESSION_KEY: &str = "user";

/// Single source of truth for the persisted session.
///
/// Storage failures never escape: they are logged and reported as `false` or
/// `None`. Only the auth context should hold one of these; it is the sole
/// writer of [`SESSION_KEY`].
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Overwrite the session with `user`. Returns whether it was persisted.
    pub async fn login(&self, user: &User) -> bool {
        let raw = match serde_json::to_string(user) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize session user");
                return false;
            }
        };
        match self.backend.set(SESSION_KEY, &raw).await {
            Ok(()) => {
                debug!(user_id = user.id, "session stored");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to persist session");
                false
            }
        }
    }

    /// Remove the session. No-op when nobody is logged in.
    pub async fn logout(&self) -> bool {
        match self.backend.remove(SESSION_KEY).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to clear session");
                false
            }
        }
    }

    /// The stored user, or `None` if absent, unreadable, or malformed.
    pub async fn current_user(&self) -> Option<User> {
        let raw = match self.backend.get(SESSION_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read session");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!(error = %e, "ignoring malformed session record"))
            .ok()
    }

    /// Key presence only; the stored text is not parsed.
    pub async fn is_authenticated(&self) -> bool {
        self.backend
            .contains(SESSION_KEY)
            .await
            .inspect_err(|e| warn!(error = %e, "failed to check session"))
            .unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::DeckError;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    /// Backend where every operation fails, like a disabled or full disk.
    pub(crate) struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, DeckError> {
            Err(DeckError::Storage("storage disabled".into()))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<(), DeckError> {
            Err(DeckError::Storage("quota exceeded".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), DeckError> {
            Err(DeckError::Storage("storage disabled".into()))
        }
    }

    /// Reads and writes work but the session key can never be removed.
    #[derive(Default)]
    pub(crate) struct StickyStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for StickyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, DeckError> {
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: &str) -> Result<(), DeckError> {
            self.inner.set(key, value).await
        }
        async fn remove(&self, _key: &str) -> Result<(), DeckError> {
            Err(DeckError::Storage("read-only storage".into()))
        }
    }

    pub(crate) fn ada() -> User {
        User {
            id: 1,
            username: "ada".into(),
            email: "ada@example.com".into(),
        }
    }

    #[tokio::test]
    async fn login_then_current_user_round_trips() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(store.login(&ada()).await);
        assert_eq!(store.current_user().await, Some(ada()));
        assert!(store.is_authenticated().await);

        let grace = User {
            id: 2,
            username: "grace".into(),
            email: "grace@example.com".into(),
        };
        assert!(store.login(&grace).await);
        assert_eq!(store.current_user().await, Some(grace));
    }

    #[tokio::test]
    async fn logout_clears_and_is_idempotent() {
        let store = SessionStore::new(Arc::new(MemoryStore::new()));
        assert!(store.logout().await);
        store.login(&ada()).await;
        assert!(store.logout().await);
        assert!(store.logout().await);
        assert_eq!(store.current_user().await, None);
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn malformed_record_reads_as_no_session_but_key_exists() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(SESSION_KEY, "{not json").await.unwrap();
        let store = SessionStore::new(backend);
        assert_eq!(store.current_user().await, None);
        // existence check, not deserialization
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn broken_backend_degrades_quietly() {
        let store = SessionStore::new(Arc::new(BrokenStore));
        assert!(!store.login(&ada()).await);
        assert!(!store.logout().await);
        assert_eq!(store.current_user().await, None);
        assert!(!store.is_authenticated().await);
    }
}
