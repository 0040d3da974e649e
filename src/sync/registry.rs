//! Connection Registry
//!
//! Maps a self-declared identity to the session that declared it. The
//! registry is metadata only: broadcasts go to every open session whether or
//! not it appears here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Process-unique session identifier
pub type SessionId = u64;

/// Handle for one live WebSocket session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: SessionId,
    /// Unix timestamp of the accept
    pub connected_at: i64,
}

/// Identity -> session map
pub struct ConnectionRegistry {
    entries: RwLock<HashMap<String, SessionHandle>>,
    next_session_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Allocate a handle for a newly accepted session
    pub fn open_session(&self) -> SessionHandle {
        SessionHandle {
            id: self.next_session_id.fetch_add(1, Ordering::SeqCst),
            connected_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Install or overwrite `identity -> session`, returning the replaced session
    ///
    /// The replaced session is not closed.
    pub fn register(&self, identity: impl Into<String>, session: SessionHandle) -> Option<SessionHandle> {
        self.entries.write().insert(identity.into(), session)
    }

    /// Remove every entry pointing at `session`, returning the identities removed
    ///
    /// Entries that were re-registered by another session are kept.
    pub fn deregister(&self, session: &SessionHandle) -> Vec<String> {
        let mut entries = self.entries.write();
        let removed: Vec<String> = entries
            .iter()
            .filter(|(_, handle)| *handle == session)
            .map(|(identity, _)| identity.clone())
            .collect();
        for identity in &removed {
            entries.remove(identity);
        }
        removed
    }

    pub fn lookup(&self, identity: &str) -> Option<SessionHandle> {
        self.entries.read().get(identity).cloned()
    }

    /// Registered identities, sorted
    pub fn identities(&self) -> Vec<String> {
        let mut identities: Vec<String> = self.entries.read().keys().cloned().collect();
        identities.sort();
        identities
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
