use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{MemorySessionStore, Session, SessionStore, SessionStoreError};

/// Shared, injectable view of the current session.
///
/// Clones share the same state. Reads hand out copies so callers never hold
/// the lock across an await. Mutation is crate-private: the token refresher,
/// the auth flows and the pipeline's terminal teardown are the only writers.
#[derive(Clone)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

impl SessionHandle {
    /// Empty handle backed by `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Handle seeded from whatever `store` has persisted.
    pub fn restore(store: Arc<dyn SessionStore>) -> Result<Self, SessionStoreError> {
        let session = store.load()?;
        Ok(Self {
            current: Arc::new(RwLock::new(session)),
            store,
        })
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// In-memory handle that starts signed in with `session`.
    pub fn from_session(session: Session) -> Self {
        let store = MemorySessionStore::with_session(session.clone());
        Self {
            current: Arc::new(RwLock::new(Some(session))),
            store: Arc::new(store),
        }
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .and_then(|s| s.access_token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Install `session` in memory and in the store.
    ///
    /// The in-memory value is updated even if persisting fails, so the
    /// running process keeps working with the fresh token.
    pub(crate) fn replace(&self, session: Session) -> Result<(), SessionStoreError> {
        *self.current.write() = Some(session.clone());
        self.store.persist(&session)
    }

    pub(crate) fn clear(&self) -> Result<(), SessionStoreError> {
        self.current.write().take();
        self.store.clear()
    }
}
