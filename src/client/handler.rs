//! Session handler
//!
//! Runs one connection's protocol loop: handshake, initial snapshots,
//! then line-at-a-time command dispatch until the stream ends. All faults
//! stay inside the session's own task; only successful vote mutations are
//! visible beyond it, via the broadcast.

use log::{debug, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;

use crate::client::SessionState;
use crate::client::registry::{
    SessionWriter, SharedRegistry, broadcast_history, broadcast_results, send_line,
};
use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::protocol::{CommandStatus, handle_command, parse_command, parse_handshake};
use crate::protocol::responses;
use crate::vote::VoteService;

/// Drives a registered session from handshake to termination.
///
/// The caller owns teardown: whatever way this returns, the session is
/// deregistered exactly once afterwards. Votes already cast are retained;
/// disconnection never rolls back the tally or the history.
pub async fn run_session(
    read_half: OwnedReadHalf,
    writer: SessionWriter,
    client_addr: SocketAddr,
    registry: SharedRegistry,
    votes: Arc<VoteService>,
    config: Arc<ServerConfig>,
) -> Result<(), SessionError> {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    set_state(&registry, &client_addr, SessionState::Handshaking).await;

    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(SessionError::HandshakeAborted);
    }
    let handshake = parse_handshake(&line);
    info!(
        "Client {} identified as {} ({})",
        client_addr, handshake.session_id, handshake.display_name
    );

    {
        let mut registry_guard = registry.lock().await;
        if let Some(handle) = registry_guard.get_mut(&client_addr) {
            let client = handle.client_mut();
            client.set_identity(handshake.session_id.clone(), handshake.display_name.clone());
            client.set_state(SessionState::Active);
        }
    }

    // The new session alone gets the current state before the loop starts.
    send_line(&writer, &responses::results_line(&votes.results().await)).await?;
    send_line(&writer, &responses::history_line(&votes.history().await)).await?;

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            info!("Connection closed by client {}", client_addr);
            break;
        }

        if line.len() > config.max_command_length {
            debug!("Dropping overlong line from {}", client_addr);
            continue;
        }

        let command = parse_command(&line);
        debug!("Received from {}: {:?}", client_addr, command);

        let result = handle_command(
            &handshake.session_id,
            &handshake.display_name,
            &command,
            &votes,
        )
        .await;

        if let Some(message) = &result.message {
            send_line(&writer, message).await?;
        }

        if result.broadcast {
            broadcast_results(&registry, &votes).await;
            broadcast_history(&registry, &votes).await;
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested disconnect", client_addr);
            set_state(&registry, &client_addr, SessionState::Disconnecting).await;
            break;
        }
    }

    Ok(())
}

async fn set_state(registry: &SharedRegistry, addr: &SocketAddr, state: SessionState) {
    if let Some(handle) = registry.lock().await.get_mut(addr) {
        handle.client_mut().set_state(state);
    }
}
