//! Error types
//!
//! Defines domain-specific error types for the voting server. Vote errors
//! are reported back to the offending client; session errors terminate
//! only the session they occurred on.

use std::fmt;
use std::io;

/// Vote service errors
#[derive(Debug)]
pub enum VoteError {
    /// The voted option is not in the configured option set
    InvalidOption(String),
}

impl fmt::Display for VoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteError::InvalidOption(option) => write!(f, "Invalid option: {}", option),
        }
    }
}

impl std::error::Error for VoteError {}

/// Per-session errors; contained within the session's own task
#[derive(Debug)]
pub enum SessionError {
    /// Connection closed before the handshake line arrived
    HandshakeAborted,
    /// I/O failure on the session's stream
    Io(io::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::HandshakeAborted => {
                write!(f, "Connection closed during handshake")
            }
            SessionError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<io::Error> for SessionError {
    fn from(error: io::Error) -> Self {
        SessionError::Io(error)
    }
}
