//! Command handlers for the voting protocol.
//!
//! Maps parsed commands onto the vote service and produces the reply and
//! broadcast decision for the session loop. No socket I/O happens here,
//! which keeps command semantics testable without connections.

use crate::protocol::Command;
use crate::protocol::responses;
use crate::vote::VoteService;

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
    Ignored,
}

/// Struct encapsulating the full result of a command execution.
///
/// `message` is the reply line for the issuing session only; `broadcast`
/// tells the session loop to push fresh RESULTS and HISTORY snapshots to
/// every live session.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
    pub broadcast: bool,
}

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `session_id` - Self-declared id of the issuing session.
/// * `display_name` - Self-declared display name, used in history entries.
/// * `command` - Reference to the parsed command enum.
/// * `votes` - Shared vote service.
pub async fn handle_command(
    session_id: &str,
    display_name: &str,
    command: &Command,
    votes: &VoteService,
) -> CommandResult {
    match command {
        Command::Vote(option) => handle_cmd_vote(session_id, display_name, option, votes).await,
        Command::GetResults => handle_cmd_get_results(votes).await,
        Command::GetHistory => handle_cmd_get_history(votes).await,
        Command::Disconnect => handle_cmd_disconnect(),
        Command::Unknown => handle_cmd_unknown(),
    }
}

/// Handles `VOTE:<option>`: casts or changes the session's vote.
///
/// On success the sender gets an acknowledgement and every live session
/// gets new snapshots; on an invalid option only the sender hears back.
async fn handle_cmd_vote(
    session_id: &str,
    display_name: &str,
    option: &str,
    votes: &VoteService,
) -> CommandResult {
    match votes.cast_vote(session_id, display_name, option).await {
        Ok(()) => CommandResult {
            status: CommandStatus::Success,
            message: Some(responses::vote_accepted(option)),
            broadcast: true,
        },
        Err(e) => CommandResult {
            status: CommandStatus::Failure(e.to_string()),
            message: Some(responses::error_line(&e.to_string())),
            broadcast: false,
        },
    }
}

/// Handles `GET_RESULTS`: resends the tally snapshot to the sender only.
async fn handle_cmd_get_results(votes: &VoteService) -> CommandResult {
    let results = votes.results().await;
    CommandResult {
        status: CommandStatus::Success,
        message: Some(responses::results_line(&results)),
        broadcast: false,
    }
}

/// Handles `GET_HISTORY`: resends the history snapshot to the sender only.
async fn handle_cmd_get_history(votes: &VoteService) -> CommandResult {
    let history = votes.history().await;
    CommandResult {
        status: CommandStatus::Success,
        message: Some(responses::history_line(&history)),
        broadcast: false,
    }
}

/// Handles `DISCONNECT`: signals graceful teardown, no reply required.
fn handle_cmd_disconnect() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: None,
        broadcast: false,
    }
}

/// Unrecognized lines are ignored; the session continues.
fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Ignored,
        message: None,
        broadcast: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes() -> VoteService {
        VoteService::new(&["Option A".to_string(), "Option B".to_string()])
    }

    #[tokio::test]
    async fn valid_vote_acknowledges_and_broadcasts() {
        let votes = votes();
        let command = Command::Vote("Option A".to_string());
        let result = handle_command("c1", "Alice", &command, &votes).await;

        assert_eq!(result.status, CommandStatus::Success);
        assert_eq!(result.message.as_deref(), Some("VOTE_ACCEPTED:Option A"));
        assert!(result.broadcast);
    }

    #[tokio::test]
    async fn invalid_vote_errors_without_broadcast() {
        let votes = votes();
        let command = Command::Vote("Bogus".to_string());
        let result = handle_command("c1", "Alice", &command, &votes).await;

        assert!(matches!(result.status, CommandStatus::Failure(_)));
        assert_eq!(
            result.message.as_deref(),
            Some("ERROR:Invalid option: Bogus")
        );
        assert!(!result.broadcast);
        assert_eq!(votes.total_votes().await, 0);
    }

    #[tokio::test]
    async fn get_results_replies_to_sender_only() {
        let votes = votes();
        votes.cast_vote("c1", "Alice", "Option B").await.unwrap();

        let result = handle_command("c2", "Bob", &Command::GetResults, &votes).await;
        let line = result.message.unwrap();
        assert!(line.starts_with("RESULTS:"));
        assert!(line.contains("Option B:1;"));
        assert!(!result.broadcast);
    }

    #[tokio::test]
    async fn get_history_replies_in_order() {
        let votes = votes();
        votes.cast_vote("c1", "Alice", "Option A").await.unwrap();
        votes.cast_vote("c2", "Bob", "Option B").await.unwrap();

        let result = handle_command("c1", "Alice", &Command::GetHistory, &votes).await;
        assert_eq!(
            result.message.as_deref(),
            Some("HISTORY:Alice voted for Option A|Bob voted for Option B|")
        );
    }

    #[tokio::test]
    async fn disconnect_closes_without_reply() {
        let votes = votes();
        let result = handle_command("c1", "Alice", &Command::Disconnect, &votes).await;
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert!(result.message.is_none());
    }

    #[tokio::test]
    async fn unknown_is_ignored_silently() {
        let votes = votes();
        let result = handle_command("c1", "Alice", &Command::Unknown, &votes).await;
        assert_eq!(result.status, CommandStatus::Ignored);
        assert!(result.message.is_none());
        assert!(!result.broadcast);
    }
}
