use crate::{SessionError, SessionResult};
use eco_storage::{LocalStorage, StorageKeys};
use eco_types::Session;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 16;

/// Change notifications published by [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(Session),
    LoggedOut,
}

/// Owner of the single live [`Session`].
pub struct SessionStore {
    storage: Box<dyn LocalStorage>,
    current: Mutex<Option<Session>>,
    last_error: Mutex<Option<String>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Open the store and rehydrate the persisted session.
    ///
    /// A missing, unreadable or corrupt slot yields a logged-out store;
    /// this never fails.
    pub fn open(storage: Box<dyn LocalStorage>) -> Self {
        let current = match Self::rehydrate(storage.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Discarding persisted session");
                None
            }
        };

        match &current {
            Some(session) => info!(email = %session.email, "Session restored"),
            None => debug!("No persisted session"),
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            current: Mutex::new(current),
            last_error: Mutex::new(None),
            events,
        }
    }

    fn rehydrate(storage: &dyn LocalStorage) -> SessionResult<Option<Session>> {
        let Some(raw) = storage.get(StorageKeys::USER)? else {
            return Ok(None);
        };
        serde_json::from_str::<Session>(&raw)
            .map(Some)
            .map_err(|e| SessionError::SessionDecodeFailed(e.to_string()))
    }

    /// Tear the store down. Subscribers observe a closed channel; the
    /// persisted slot is left as is.
    pub fn close(self) {
        debug!("Session store closed");
    }

    /// Replace the current session with `session` and persist it.
    ///
    /// Clears any recorded error. The in-memory session is updated even when
    /// persisting fails; the storage error is returned so the caller can warn.
    pub fn login(&self, session: Session) -> SessionResult<()> {
        *self.current.lock() = Some(session.clone());
        *self.last_error.lock() = None;
        info!(email = %session.email, user_type = session.user_type, "Logged in");
        let _ = self.events.send(SessionEvent::LoggedIn(session.clone()));

        let encoded = serde_json::to_string(&session)?;
        self.storage.set(StorageKeys::USER, &encoded)?;
        Ok(())
    }

    /// Clear the session and the persisted slot. Succeeds when already
    /// logged out.
    pub fn log_out(&self) -> SessionResult<()> {
        let previous = self.current.lock().take();
        *self.last_error.lock() = None;
        if previous.is_some() {
            info!("Logged out");
        }
        let _ = self.events.send(SessionEvent::LoggedOut);

        self.storage.delete(StorageKeys::USER)?;
        Ok(())
    }

    pub fn current_session(&self) -> Option<Session> {
        self.current.lock().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Record a user-displayable authentication error (e.g. a rejected login).
    pub fn record_error(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "Auth error recorded");
        *self.last_error.lock() = Some(message);
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_storage::{FileStorage, MemoryStorage, StorageError, StorageResult};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn admin() -> Session {
        Session::new(Some(7), "ana@example.com", 1)
    }

    struct ReadOnlyStorage;

    impl LocalStorage for ReadOnlyStorage {
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn delete(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_login_survives_reopen() {
        let dir = tempdir().unwrap();

        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let store = SessionStore::open(Box::new(storage));
        assert_eq!(store.current_session(), None);
        store.login(admin()).unwrap();
        store.close();

        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let reopened = SessionStore::open(Box::new(storage));
        assert_eq!(reopened.current_session(), Some(admin()));
    }

    #[test]
    fn test_log_out_clears_persisted_slot() {
        let storage = Arc::new(MemoryStorage::new());

        let store = SessionStore::open(Box::new(storage.clone()));
        store.login(admin()).unwrap();
        store.log_out().unwrap();
        assert_eq!(store.current_session(), None);
        assert!(!storage.has(StorageKeys::USER).unwrap());

        let reopened = SessionStore::open(Box::new(storage));
        assert_eq!(reopened.current_session(), None);
    }

    #[test]
    fn test_log_out_without_session_succeeds() {
        let store = SessionStore::open(Box::new(MemoryStorage::new()));
        store.log_out().unwrap();
        store.log_out().unwrap();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_corrupt_slot_means_logged_out() {
        for raw in ["not json", "{}", r#"{"email":"a@b.co"}"#, "null"] {
            let storage = MemoryStorage::new();
            storage.set(StorageKeys::USER, raw).unwrap();

            let store = SessionStore::open(Box::new(storage));
            assert_eq!(store.current_session(), None, "slot {raw:?}");
        }
    }

    #[test]
    fn test_login_is_last_write_wins_and_clears_error() {
        let store = SessionStore::open(Box::new(MemoryStorage::new()));
        store.record_error("Invalid credentials");
        assert_eq!(store.last_error().as_deref(), Some("Invalid credentials"));

        store.login(admin()).unwrap();
        let chef = Session::new(Some(8), "chef@example.com", 5);
        store.login(chef.clone()).unwrap();

        assert_eq!(store.current_session(), Some(chef));
        assert_eq!(store.last_error(), None);
    }

    #[test]
    fn test_login_keeps_memory_state_when_persisting_fails() {
        let store = SessionStore::open(Box::new(ReadOnlyStorage));

        let result = store.login(admin());
        assert!(matches!(result, Err(SessionError::Storage(_))));
        assert_eq!(store.current_session(), Some(admin()));
    }

    #[tokio::test]
    async fn test_subscribers_see_login_and_logout() {
        let store = SessionStore::open(Box::new(MemoryStorage::new()));
        let mut rx = store.subscribe();

        store.login(admin()).unwrap();
        store.log_out().unwrap();

        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedIn(admin()));
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedOut);

        store.close();
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
