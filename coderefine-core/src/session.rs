//! Process-wide session store.
//!
//! The only shared mutable state in the client. The auth flow saves into it,
//! the API client clears it on an authorization failure, and everything else
//! reads it. Changes are broadcast over a `tokio::sync::watch` channel so the
//! shell can react to a forced logout without polling.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::error::StorageError;
use crate::storage::Storage;
use crate::types::Session;

pub struct SessionStore {
    state: watch::Sender<Option<Session>>,
    generation: AtomicU64,
    storage: Option<Storage>,
}

impl SessionStore {
    /// Opens durable storage at `path` and seeds the in-memory state from it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if [`Storage::open`] or the initial
    /// [`Storage::load_session`] fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let storage = Storage::open(path).await?;
        let initial = storage.load_session().await?;
        if let Some(s) = &initial {
            tracing::info!(user = %s.user.username, "restored persisted session");
        }
        Ok(Self::build(initial, Some(storage)))
    }

    /// A store with no durable backing. Sessions last for the process only.
    pub fn in_memory() -> Self {
        Self::build(None, None)
    }

    fn build(initial: Option<Session>, storage: Option<Storage>) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state, generation: AtomicU64::new(0), storage }
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Just the bearer token of the current session.
    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Counter bumped by every `save` and `clear`.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// Replaces the current session and persists it.
    ///
    /// The in-memory state is updated first; a storage failure is logged and
    /// does not undo it.
    pub async fn save(&self, session: Session) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(Some(session.clone()));
        tracing::info!(user = %session.user.username, "session saved");
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_session(&session).await {
                tracing::warn!("failed to persist session: {e}");
            }
        }
    }

    /// Drops the current session from memory and storage.
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let previous = self.state.send_replace(None);
        if previous.is_some() {
            tracing::info!("session cleared");
        }
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.clear_session().await {
                tracing::warn!("failed to clear persisted session: {e}");
            }
        }
    }

    /// Clears only if nothing was saved or cleared since `generation` was read.
    ///
    /// Returns `true` when the session was cleared by this call.
    pub async fn clear_if_generation(&self, generation: u64) -> bool {
        if self
            .generation
            .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(generation, "stale authorization failure ignored");
            return false;
        }
        self.state.send_replace(None);
        tracing::info!("session cleared after authorization failure");
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.clear_session().await {
                tracing::warn!("failed to clear persisted session: {e}");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::User;

    fn session(token: &str) -> Session {
        Session {
            token: token.into(),
            user: User { username: "ada".into(), email: "ada@example.com".into() },
        }
    }

    #[tokio::test]
    async fn save_then_clear() {
        let store = SessionStore::in_memory();
        assert!(store.current().is_none());

        store.save(session("t1")).await;
        assert_eq!(store.token().as_deref(), Some("t1"));
        assert_eq!(store.current().unwrap().user.username, "ada");

        store.clear().await;
        assert!(store.current().is_none());
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SessionStore::in_memory();
        let mut rx = store.subscribe();
        store.save(session("t1")).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());
        store.clear().await;
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn stale_generation_does_not_clear_new_login() {
        let store = SessionStore::in_memory();
        store.save(session("old")).await;
        let issued_under = store.generation();

        // Re-login happens while a request made with "old" is in flight.
        store.save(session("new")).await;
        assert!(!store.clear_if_generation(issued_under).await);
        assert_eq!(store.token().as_deref(), Some("new"));

        let current = store.generation();
        assert!(store.clear_if_generation(current).await);
        assert!(store.current().is_none());
    }
}
