//! Process-wide session state with durable persistence.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::{PersistedSession, Session, User, UserId};
use crate::error::{DomainError, DomainResult};
use crate::ports::SessionStorage;

/// Fixed storage key of the session record.
pub const SESSION_STORAGE_KEY: &str = "user-storage";

/// Holds `{user, token, isLoggedIn}` and mirrors every change to storage.
///
/// One instance is built at startup and shared (`Arc`) with the data source
/// and the client.
pub struct SessionStore {
    state: RwLock<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// A logged-out store that has not looked at storage.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: RwLock::new(Session::default()),
            storage,
        }
    }

    /// Rehydrate from storage. Missing or unreadable records mean logged out.
    pub async fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let state = match storage.load(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<PersistedSession>(&raw) {
                Ok(persisted) => sanitize(persisted.state),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unreadable session record");
                    Session::default()
                }
            },
            Ok(None) => Session::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Session storage unavailable, starting logged out");
                Session::default()
            }
        };

        tracing::debug!(logged_in = state.is_logged_in, "Session restored");

        Self {
            state: RwLock::new(state),
            storage,
        }
    }

    pub fn current(&self) -> Session {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_logged_in
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user_id()
    }

    /// Set user, token and the logged-in flag, then persist.
    pub async fn login(&self, user: User, token: String) -> DomainResult<()> {
        self.replace(Session::logged_in(user, token)).await
    }

    /// Clear everything, then persist.
    pub async fn logout(&self) -> DomainResult<()> {
        self.replace(Session::default()).await
    }

    /// The in-memory state changes even when persisting fails.
    async fn replace(&self, next: Session) -> DomainResult<()> {
        let persisted = PersistedSession::new(next.clone());
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;

        let raw = serde_json::to_string(&persisted)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        self.storage
            .save(SESSION_STORAGE_KEY, &raw)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))
    }
}

/// A half-filled record (flag without a token, or the reverse) counts as logged out.
fn sanitize(state: Session) -> Session {
    if state.is_logged_in && state.user.is_some() && state.token.is_some() {
        state
    } else {
        Session::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StorageError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapStorage {
        records: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl SessionStorage for MapStorage {
        async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.records.lock().unwrap().get(key).cloned())
        }

        async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.records
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn alice() -> User {
        User {
            id: UserId(1),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            nickname: "Al".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_and_logout_update_all_fields() {
        let store = SessionStore::new(Arc::new(MapStorage::default()));
        assert!(!store.is_logged_in());

        store.login(alice(), "tok".to_string()).await.unwrap();
        assert!(store.is_logged_in());
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user_id(), Some(UserId(1)));

        store.logout().await.unwrap();
        assert_eq!(store.current(), Session::default());
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let storage = Arc::new(MapStorage::default());
        let store = SessionStore::new(storage.clone());
        store.login(alice(), "tok".to_string()).await.unwrap();

        let raw = storage.load(SESSION_STORAGE_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["state"]["isLoggedIn"], true);
        assert_eq!(json["version"], 0);

        let restored = SessionStore::restore(storage).await;
        assert_eq!(restored.user(), Some(alice()));
    }

    #[tokio::test]
    async fn test_restore_treats_garbage_as_logged_out() {
        let storage = Arc::new(MapStorage::default());
        storage.save(SESSION_STORAGE_KEY, "{not json").await.unwrap();
        let restored = SessionStore::restore(storage).await;
        assert!(!restored.is_logged_in());
    }

    #[tokio::test]
    async fn test_restore_rejects_flag_without_token() {
        let storage = Arc::new(MapStorage::default());
        storage
            .save(
                SESSION_STORAGE_KEY,
                r#"{"state":{"user":null,"token":null,"isLoggedIn":true},"version":0}"#,
            )
            .await
            .unwrap();
        let restored = SessionStore::restore(storage).await;
        assert!(!restored.is_logged_in());
    }
}
