//! Listener and accept loop
//!
//! Binds the configured port and runs an unbounded accept loop, spawning
//! one task per connection. A connection is registered before its
//! handshake completes, so a freshly accepted session can already be the
//! target of a broadcast ahead of its own initial snapshot.

use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::handler::run_session;
use crate::client::registry::{SessionWriter, send_line};
use crate::client::{Client, ClientRegistry, SessionHandle, SessionState, SharedRegistry};
use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::protocol::responses;
use crate::vote::VoteService;

pub struct Server {
    registry: SharedRegistry,
    votes: Arc<VoteService>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listener and builds the shared state.
    ///
    /// A failed bind is the only process-fatal error in this subsystem.
    pub async fn new(config: ServerConfig) -> Self {
        let addr = config.socket_addr();

        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                panic!("Server startup failed on socket {}: {}", addr, e);
            }
        };

        Self {
            registry: Arc::new(Mutex::new(ClientRegistry::new())),
            votes: Arc::new(VoteService::new(&config.options)),
            listener,
            config: Arc::new(config),
        }
    }

    /// The address the listener actually bound, for port-0 binds.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process is externally terminated.
    pub async fn start(&self) {
        info!(
            "Starting voting server on {} (max {} clients, options: {:?})",
            self.config.socket_addr(),
            self.config.max_clients,
            self.config.options
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    let votes = Arc::clone(&self.votes);
                    let config = Arc::clone(&self.config);

                    // Spawn a task per client so the accept loop never blocks
                    tokio::spawn(async move {
                        handle_connection(stream, addr, registry, votes, config).await;
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new connection, runs its session, and deregisters it.
///
/// This is the single teardown point: every exit path of the session loop
/// ends here, and removal from the registry happens exactly once. The vote
/// service is never touched on the way out; a cast vote survives its
/// voter's disconnection.
async fn handle_connection(
    stream: TcpStream,
    client_addr: SocketAddr,
    registry: SharedRegistry,
    votes: Arc<VoteService>,
    config: Arc<ServerConfig>,
) {
    info!("New connection: {}", client_addr);

    let (read_half, write_half) = stream.into_split();
    let writer: SessionWriter = Arc::new(Mutex::new(write_half));

    {
        let mut registry_guard = registry.lock().await;

        if registry_guard.len() >= config.max_clients {
            drop(registry_guard);
            warn!("Rejecting {}: server full", client_addr);
            let _ = send_line(&writer, &responses::error_line("server full")).await;
            return;
        }

        let mut client = Client::default();
        client.set_client_addr(Some(client_addr));
        registry_guard.insert(
            client_addr,
            SessionHandle::new(Arc::clone(&writer), client),
        );
        info!(
            "Registered session {} ({}/{} clients)",
            client_addr,
            registry_guard.len(),
            config.max_clients
        );
    }

    let outcome = run_session(
        read_half,
        Arc::clone(&writer),
        client_addr,
        Arc::clone(&registry),
        votes,
        config,
    )
    .await;

    match outcome {
        Ok(()) => {}
        Err(SessionError::HandshakeAborted) => {
            info!("Client {} left before handshake", client_addr);
        }
        Err(SessionError::Io(e)) => {
            error!("Session error for {}: {}", client_addr, e);
        }
    }

    let mut registry_guard = registry.lock().await;
    if let Some(mut handle) = registry_guard.remove(&client_addr) {
        handle.client_mut().set_state(SessionState::Closed);
        let voter = handle
            .client()
            .session_id()
            .cloned()
            .unwrap_or_else(|| "unidentified".to_string());
        info!(
            "Client {} ({}) disconnected ({} clients remain)",
            client_addr,
            voter,
            registry_guard.len()
        );
    }
}
