//! Full-document broadcaster
//!
//! Every open session holds its own subscription to a `tokio::sync::broadcast`
//! channel. Publishing never waits on a session: a session that cannot keep
//! up lags and skips to the newest full update, and a closed session simply
//! drops its receiver. Neither affects delivery to anyone else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use super::messages::ServerMessage;
use crate::types::Document;

/// One serialized `full_update` message, shared by every recipient
#[derive(Clone, Debug)]
pub struct FullUpdate {
    /// Monotonically increasing broadcast number
    pub sequence_id: u64,
    /// `{"type":"full_update","payload":...}` as JSON text
    pub json: Arc<str>,
}

/// Fan-out of full-document updates to all open sessions
pub struct Broadcaster {
    tx: broadcast::Sender<FullUpdate>,
    sequence_counter: AtomicU64,
}

impl Broadcaster {
    /// Create a broadcaster retaining up to `capacity` updates per lagging session
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Serialize a document into a `full_update` envelope
    pub fn encode(document: &Document) -> serde_json::Result<String> {
        serde_json::to_string(&ServerMessage::FullUpdate(document))
    }

    /// Publish the document to every open session
    ///
    /// Returns the number of sessions the update was handed to.
    pub fn broadcast_all(&self, document: &Document) -> usize {
        let json = match Self::encode(document) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize document for broadcast");
                return 0;
            }
        };

        let sequence_id = self.sequence_counter.fetch_add(1, Ordering::SeqCst);
        let update = FullUpdate {
            sequence_id,
            json: Arc::from(json),
        };

        // An error only means no session is open right now
        let recipients = self.tx.send(update).unwrap_or(0);
        tracing::debug!(sequence_id, recipients, "Broadcast full update");
        recipients
    }

    /// Subscribe a newly opened session
    pub fn subscribe(&self) -> broadcast::Receiver<FullUpdate> {
        self.tx.subscribe()
    }

    /// Number of sessions currently subscribed
    pub fn session_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Number of broadcasts issued so far
    pub fn broadcasts_sent(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SeedConfig, StateStore};
    use tokio::sync::broadcast::error::RecvError;

    #[tokio::test]
    async fn test_broadcast_reaches_every_session() {
        let broadcaster = Broadcaster::new(8);
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        let recipients = broadcaster.broadcast_all(&Document::new());
        assert_eq!(recipients, 2);

        let from_a = a.recv().await.unwrap();
        let from_b = b.recv().await.unwrap();
        assert_eq!(from_a.sequence_id, 0);
        assert_eq!(from_a.json, from_b.json);
        assert!(from_a.json.starts_with(r#"{"type":"full_update","payload":"#));
    }

    #[tokio::test]
    async fn test_quiescent_broadcasts_are_byte_identical() {
        let store = StateStore::seeded(&SeedConfig::default());
        let broadcaster = Broadcaster::new(8);
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast_all(store.document());
        broadcaster.broadcast_all(store.document());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.json.as_bytes(), second.json.as_bytes());
        assert_eq!(second.sequence_id, 1);
    }

    #[test]
    fn test_broadcast_without_sessions() {
        let broadcaster = Broadcaster::new(8);
        assert_eq!(broadcaster.broadcast_all(&Document::new()), 0);
        assert_eq!(broadcaster.broadcasts_sent(), 1);
    }

    #[tokio::test]
    async fn test_lagging_session_does_not_affect_others() {
        let broadcaster = Broadcaster::new(2);
        let mut slow = broadcaster.subscribe();
        let mut fast = broadcaster.subscribe();

        for _ in 0..3 {
            broadcaster.broadcast_all(&Document::new());
            fast.recv().await.unwrap();
        }

        assert!(matches!(slow.recv().await, Err(RecvError::Lagged(1))));
        let next = slow.recv().await.unwrap();
        assert_eq!(next.sequence_id, 1);
    }

    #[test]
    fn test_dropped_session_is_not_counted() {
        let broadcaster = Broadcaster::new(8);
        let rx = broadcaster.subscribe();
        assert_eq!(broadcaster.session_count(), 1);
        drop(rx);
        assert_eq!(broadcaster.session_count(), 0);
    }
}
