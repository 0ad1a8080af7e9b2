//! Module `state`
//!
//! Defines the `Client` struct and associated methods to manage the state
//! of one connected voter: the self-declared identity from the handshake,
//! the peer address, and the session lifecycle.
//!
//! Identity is declared by the client and scoped to the connection. A
//! client that reconnects with a freshly generated id is a new voter as
//! far as the vote records are concerned; changing a vote only works
//! within one continuous connection.

use std::net::SocketAddr;

/// Lifecycle of one session. `Closed` is terminal; deregistration from
/// the registry happens exactly once, on entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Handshaking,
    Active,
    Disconnecting,
    Closed,
}

/// Represents the state of a connected voting client.
pub struct Client {
    session_id: Option<String>,
    display_name: Option<String>,
    client_addr: Option<SocketAddr>,
    state: SessionState,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            session_id: None,
            display_name: None,
            client_addr: None,
            state: SessionState::Connecting,
        }
    }
}

impl Client {
    /// Returns the self-declared session id, once the handshake completed.
    pub fn session_id(&self) -> Option<&String> {
        self.session_id.as_ref()
    }

    /// Returns the self-declared display name, once the handshake completed.
    pub fn display_name(&self) -> Option<&String> {
        self.display_name.as_ref()
    }

    /// Returns the client's socket address if known.
    pub fn client_addr(&self) -> Option<&SocketAddr> {
        self.client_addr.as_ref()
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns whether the session finished its handshake and is serving
    /// commands.
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Records the identity declared in the handshake line.
    pub fn set_identity(&mut self, session_id: String, display_name: String) {
        self.session_id = Some(session_id);
        self.display_name = Some(display_name);
    }

    /// Sets the client's socket address.
    pub fn set_client_addr(&mut self, addr: Option<SocketAddr>) {
        self.client_addr = addr;
    }

    /// Advances the lifecycle state. `Closed` is sticky.
    pub fn set_state(&mut self, state: SessionState) {
        if self.state != SessionState::Closed {
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_is_connecting_and_anonymous() {
        let client = Client::default();
        assert_eq!(client.state(), SessionState::Connecting);
        assert!(client.session_id().is_none());
        assert!(client.display_name().is_none());
        assert!(!client.is_active());
    }

    #[test]
    fn identity_is_recorded_after_handshake() {
        let mut client = Client::default();
        client.set_identity("c1".to_string(), "Alice".to_string());
        assert_eq!(client.session_id().map(String::as_str), Some("c1"));
        assert_eq!(client.display_name().map(String::as_str), Some("Alice"));
    }

    #[test]
    fn peer_address_is_tracked() {
        let mut client = Client::default();
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        client.set_client_addr(Some(addr));
        assert_eq!(client.client_addr(), Some(&addr));
    }

    #[test]
    fn closed_is_terminal() {
        let mut client = Client::default();
        client.set_state(SessionState::Active);
        assert!(client.is_active());
        client.set_state(SessionState::Closed);
        client.set_state(SessionState::Active);
        assert_eq!(client.state(), SessionState::Closed);
    }
}
