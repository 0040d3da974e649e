//! Sync engine - the single writer of the market document
//!
//! A tokio task exclusively owns the [`StateStore`] and processes [`Command`]s
//! from an mpsc queue one at a time, in arrival order. Every mutating command
//! is followed by a broadcast serialized from the fully-applied document, so
//! no session ever sees a partial merge.
//!
//! Public API: [`EngineHandle`] (cloneable async handle) and [`spawn_engine`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use super::broadcaster::Broadcaster;
use super::messages::{BulkUpdate, ClientUpdate};
use super::reconcile::{apply_bulk_update, apply_client_update, UpdateOutcome};
use crate::auth::{authenticate, LoginRequest, LoginSuccess};
use crate::error::{AuthError, SyncError, SyncResult};
use crate::store::StateStore;
use crate::types::{Document, User};

/// Messages sent from [`EngineHandle`] to the engine task
pub(crate) enum Command {
    ClientUpdate {
        update: ClientUpdate,
        reply: oneshot::Sender<UpdateOutcome>,
    },
    BulkUpdate {
        update: BulkUpdate,
        reply: oneshot::Sender<SyncResult<UpdateOutcome>>,
    },
    Broadcast {
        reply: oneshot::Sender<usize>,
    },
    Snapshot {
        reply: oneshot::Sender<Document>,
    },
    GetUser {
        username: String,
        reply: oneshot::Sender<Option<User>>,
    },
    ListUsers {
        reply: oneshot::Sender<BTreeMap<String, User>>,
    },
    Authenticate {
        request: LoginRequest,
        reply: oneshot::Sender<Result<LoginSuccess, AuthError>>,
    },
}

/// Runs the engine loop until every handle is dropped
async fn run_engine(mut store: StateStore, broadcaster: Arc<Broadcaster>, mut rx: mpsc::Receiver<Command>) {
    tracing::info!(users = store.document().user_count(), "Sync engine started");

    while let Some(command) = rx.recv().await {
        match command {
            Command::ClientUpdate { update, reply } => {
                let from = update.current_user.clone();
                let outcome = apply_client_update(&mut store, update);
                let recipients = broadcaster.broadcast_all(store.document());
                tracing::info!(user = %from, recipients, "Applied client update");
                let _ = reply.send(outcome);
            }
            Command::BulkUpdate { update, reply } => {
                let result = apply_bulk_update(&mut store, update);
                if let Ok(ref outcome) = result {
                    let recipients = broadcaster.broadcast_all(store.document());
                    tracing::info!(merged = outcome.merged.len(), recipients, "Applied bulk update");
                }
                let _ = reply.send(result);
            }
            Command::Broadcast { reply } => {
                let _ = reply.send(broadcaster.broadcast_all(store.document()));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(store.document().clone());
            }
            Command::GetUser { username, reply } => {
                let _ = reply.send(store.get_user(&username).cloned());
            }
            Command::ListUsers { reply } => {
                let _ = reply.send(store.list_users());
            }
            Command::Authenticate { request, reply } => {
                let _ = reply.send(authenticate(&store, &request));
            }
        }
    }

    tracing::info!("Sync engine stopped");
}

/// Start the engine task on the current tokio runtime
pub fn spawn_engine(store: StateStore, broadcaster: Arc<Broadcaster>, queue_capacity: usize) -> EngineHandle {
    let (tx, rx) = mpsc::channel(queue_capacity.max(1));
    tokio::spawn(run_engine(store, broadcaster, rx));
    EngineHandle { tx }
}

/// Cloneable handle for submitting commands to the engine
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> SyncResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| SyncError::EngineUnavailable)?;
        rx.await.map_err(|_| SyncError::EngineUnavailable)
    }

    /// Merge a `client_update` envelope and broadcast the result
    pub async fn apply_client_update(&self, update: ClientUpdate) -> SyncResult<UpdateOutcome> {
        self.request(|reply| Command::ClientUpdate { update, reply }).await
    }

    /// Apply a bulk update; broadcasts only if it was accepted
    pub async fn apply_bulk_update(&self, update: BulkUpdate) -> SyncResult<UpdateOutcome> {
        self.request(|reply| Command::BulkUpdate { update, reply }).await?
    }

    /// Broadcast the current document without changing it
    pub async fn broadcast_all(&self) -> SyncResult<usize> {
        self.request(|reply| Command::Broadcast { reply }).await
    }

    /// Snapshot of the document as of the last applied command
    pub async fn document(&self) -> SyncResult<Document> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn get_user(&self, username: impl Into<String>) -> SyncResult<Option<User>> {
        let username = username.into();
        self.request(|reply| Command::GetUser { username, reply }).await
    }

    /// All users except the admin account
    pub async fn list_users(&self) -> SyncResult<BTreeMap<String, User>> {
        self.request(|reply| Command::ListUsers { reply }).await
    }

    pub async fn authenticate(&self, request: LoginRequest) -> SyncResult<LoginSuccess> {
        let result = self.request(|reply| Command::Authenticate { request, reply }).await?;
        result.map_err(SyncError::from)
    }
}
