//! Wire protocol implementation
//!
//! Handles parsing of client lines, command dispatch, and response
//! formatting for the line-oriented voting protocol.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, Handshake, parse_command, parse_handshake};
pub use handlers::{CommandResult, CommandStatus, handle_command};
