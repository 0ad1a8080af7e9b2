//! Module `commands`
//!
//! Defines the protocol command parsing logic and the data structures used
//! to represent commands and the session handshake. Parsing is pure so the
//! protocol can be unit tested without opening sockets.

/// Represents a protocol command parsed from one client input line.
///
/// Dispatch is by exact prefix: `VOTE:` carries the voted option verbatim
/// (including any surrounding whitespace the client sent), the remaining
/// commands are bare keywords. Anything else is `Unknown` and ignored by
/// the session loop.
#[derive(Debug, PartialEq)]
pub enum Command {
    Vote(String),
    GetHistory,
    GetResults,
    Disconnect,
    Unknown,
}

/// Self-declared identity from the first line of a connection.
#[derive(Debug, PartialEq)]
pub struct Handshake {
    pub session_id: String,
    pub display_name: String,
}

/// Parses a raw line received from a client into the `Command` enum.
///
/// Only line terminators are stripped; leading whitespace makes a line
/// unrecognized because dispatch is by exact prefix.
pub fn parse_command(raw: &str) -> Command {
    let line = raw.trim_end_matches(['\r', '\n']);

    if let Some(option) = line.strip_prefix("VOTE:") {
        return Command::Vote(option.to_string());
    }

    match line {
        "GET_HISTORY" => Command::GetHistory,
        "GET_RESULTS" => Command::GetResults,
        "DISCONNECT" => Command::Disconnect,
        _ => Command::Unknown,
    }
}

/// Parses the handshake line `"<sessionId>:<displayName>"`.
///
/// A line with no separator supplies both the id and the name; that is
/// defined behavior, not a malformed handshake.
pub fn parse_handshake(raw: &str) -> Handshake {
    let line = raw.trim_end_matches(['\r', '\n']);

    match line.split_once(':') {
        Some((id, name)) => Handshake {
            session_id: id.to_string(),
            display_name: name.to_string(),
        },
        None => Handshake {
            session_id: line.to_string(),
            display_name: line.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vote_with_option() {
        assert_eq!(
            parse_command("VOTE:Option A\n"),
            Command::Vote("Option A".to_string())
        );
    }

    #[test]
    fn vote_option_is_taken_verbatim() {
        // No trimming inside the payload; validation happens in the service.
        assert_eq!(
            parse_command("VOTE: Option A"),
            Command::Vote(" Option A".to_string())
        );
        assert_eq!(parse_command("VOTE:"), Command::Vote(String::new()));
    }

    #[test]
    fn parses_bare_keywords() {
        assert_eq!(parse_command("GET_HISTORY\r\n"), Command::GetHistory);
        assert_eq!(parse_command("GET_RESULTS"), Command::GetResults);
        assert_eq!(parse_command("DISCONNECT\n"), Command::Disconnect);
    }

    #[test]
    fn unrecognized_lines_are_unknown() {
        assert_eq!(parse_command(""), Command::Unknown);
        assert_eq!(parse_command("vote:Option A"), Command::Unknown);
        assert_eq!(parse_command(" GET_RESULTS"), Command::Unknown);
        assert_eq!(parse_command("HELLO"), Command::Unknown);
    }

    #[test]
    fn handshake_splits_on_first_colon() {
        let hs = parse_handshake("c1:Alice\n");
        assert_eq!(hs.session_id, "c1");
        assert_eq!(hs.display_name, "Alice");

        // Only the first colon separates; the name keeps the rest.
        let hs = parse_handshake("c2:Bob:the:Builder");
        assert_eq!(hs.session_id, "c2");
        assert_eq!(hs.display_name, "Bob:the:Builder");
    }

    #[test]
    fn handshake_without_separator_uses_line_as_both() {
        let hs = parse_handshake("Alice");
        assert_eq!(hs.session_id, "Alice");
        assert_eq!(hs.display_name, "Alice");
    }
}
