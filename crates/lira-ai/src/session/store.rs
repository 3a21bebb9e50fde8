//! Process-lifetime session store.

use std::collections::HashMap;
use std::sync::Arc;

use lira_common::{GatewayError, SessionId};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use super::types::{Session, SessionSummary, Turn};

struct Slot {
    session: Session,
    /// Held by the one task currently extending this session.
    writer: Arc<Mutex<()>>,
}

#[derive(Default)]
struct Inner {
    slots: HashMap<SessionId, Slot>,
    /// Creation order, for a stable `list()`.
    order: Vec<SessionId>,
}

/// Thread-safe, volatile session store. No eviction, no size bound.
///
/// The map lock is only held for short in-memory sections, so readers never
/// wait on a model call. Writers that span a model call serialize on the
/// per-session writer lock instead.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a session.
    pub async fn get(&self, id: &SessionId) -> Result<Session, GatewayError> {
        let inner = self.inner.read().await;
        inner
            .slots
            .get(id)
            .map(|slot| slot.session.clone())
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    /// Create a session titled by, and holding, its first user turn.
    pub async fn create(&self, first_user_text: impl Into<String>) -> Session {
        self.create_locked(first_user_text).await.0
    }

    /// Like `create`, but the session's writer lock is already held when the
    /// session becomes visible, so no other writer can slip in first.
    pub(crate) async fn create_locked(
        &self,
        first_user_text: impl Into<String>,
    ) -> (Session, OwnedMutexGuard<()>) {
        let mut inner = self.inner.write().await;

        let mut id = SessionId::new();
        while inner.slots.contains_key(&id) {
            id = SessionId::new();
        }

        let writer = Arc::new(Mutex::new(()));
        let guard = Arc::clone(&writer).lock_owned().await;

        let session = Session::start(id.clone(), first_user_text);
        inner.slots.insert(
            id.clone(),
            Slot {
                session: session.clone(),
                writer,
            },
        );
        inner.order.push(id.clone());

        debug!(session_id = %id, sessions = inner.order.len(), "session created");
        (session, guard)
    }

    pub async fn append(&self, id: &SessionId, turn: Turn) -> Result<(), GatewayError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .slots
            .get_mut(id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        slot.session.push(turn);
        Ok(())
    }

    /// `{id, title}` for every session, in creation order.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.slots.get(id))
            .map(|slot| slot.session.summary())
            .collect()
    }

    /// Number of sessions created since startup.
    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    /// The writer lock for a session, if it exists.
    pub(crate) async fn writer(&self, id: &SessionId) -> Option<Arc<Mutex<()>>> {
        let inner = self.inner.read().await;
        inner.slots.get(id).map(|slot| Arc::clone(&slot.writer))
    }
}
