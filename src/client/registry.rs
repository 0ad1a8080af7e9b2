//! Client registry and broadcaster
//!
//! Tracks the set of live sessions and pushes state snapshots to all of
//! them. Every access goes through one mutex, so concurrent join, leave,
//! and broadcast iteration serialize against each other. A failed write to
//! one session is logged and skipped; the failing session tears itself
//! down through its own read-loop error path.

use log::{info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

use crate::client::Client;
use crate::protocol::responses;
use crate::vote::VoteService;

/// Write half of a session's connection, shared between the session's own
/// task and broadcast rounds.
pub type SessionWriter = Arc<Mutex<OwnedWriteHalf>>;

/// The registry as shared between the accept loop and all session tasks.
pub type SharedRegistry = Arc<Mutex<ClientRegistry>>;

/// Couples a session's shared write half with its client state.
pub struct SessionHandle {
    writer: SessionWriter,
    client: Client,
}

impl SessionHandle {
    pub fn new(writer: SessionWriter, client: Client) -> Self {
        Self { writer, client }
    }

    pub fn writer(&self) -> SessionWriter {
        Arc::clone(&self.writer)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}

/// Registry for tracking live sessions, keyed by peer address.
pub struct ClientRegistry {
    sessions: HashMap<SocketAddr, SessionHandle>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, addr: SocketAddr, handle: SessionHandle) {
        self.sessions.insert(addr, handle);
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> Option<SessionHandle> {
        self.sessions.remove(addr)
    }

    pub fn get(&self, addr: &SocketAddr) -> Option<&SessionHandle> {
        self.sessions.get(addr)
    }

    pub fn get_mut(&mut self, addr: &SocketAddr) -> Option<&mut SessionHandle> {
        self.sessions.get_mut(addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SocketAddr, &SessionHandle)> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes one newline-terminated protocol line to a session.
pub async fn send_line(writer: &SessionWriter, line: &str) -> std::io::Result<()> {
    let mut writer = writer.lock().await;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// Pushes a fresh `RESULTS:` snapshot to every live session.
pub async fn broadcast_results(registry: &SharedRegistry, votes: &VoteService) {
    let results = votes.results().await;
    let total = votes.total_votes().await;
    let line = responses::results_line(&results);
    info!("Broadcasting results ({} total votes): {}", total, line);
    broadcast_line(registry, &line).await;
}

/// Pushes a fresh `HISTORY:` snapshot to every live session.
pub async fn broadcast_history(registry: &SharedRegistry, votes: &VoteService) {
    let history = votes.history().await;
    let line = responses::history_line(&history);
    broadcast_line(registry, &line).await;
}

/// Sends the identical bytes to every registered session, best-effort.
async fn broadcast_line(registry: &SharedRegistry, line: &str) {
    let registry = registry.lock().await;
    for (addr, handle) in registry.iter() {
        if let Err(e) = send_line(&handle.writer(), line).await {
            warn!("Failed to send to {}: {}", addr, e);
        }
    }
}
