//! Response formatting
//!
//! Builds the server-to-client protocol lines. Snapshot lines carry a
//! trailing separator and list every entry exactly once; the newline is
//! appended by the socket layer, not here.

/// Format a `RESULTS:` snapshot line from a tally snapshot.
///
/// Every known option appears once as `<option>:<count>;`. Iteration order
/// follows the snapshot and is not guaranteed stable across calls.
pub fn results_line(results: &[(String, u64)]) -> String {
    let mut line = String::from("RESULTS:");
    for (option, count) in results {
        line.push_str(option);
        line.push(':');
        line.push_str(&count.to_string());
        line.push(';');
    }
    line
}

/// Format a `HISTORY:` snapshot line, entries in chronological order.
pub fn history_line(entries: &[String]) -> String {
    let mut line = String::from("HISTORY:");
    for entry in entries {
        line.push_str(entry);
        line.push('|');
    }
    line
}

/// Format the acknowledgement sent to a voter after a successful cast.
pub fn vote_accepted(option: &str) -> String {
    format!("VOTE_ACCEPTED:{}", option)
}

/// Format an error reply sent to the offending session only.
pub fn error_line(message: &str) -> String {
    format!("ERROR:{}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_line_lists_every_option_with_trailing_separator() {
        let results = vec![
            ("Option A".to_string(), 1),
            ("Option B".to_string(), 0),
        ];
        assert_eq!(results_line(&results), "RESULTS:Option A:1;Option B:0;");
    }

    #[test]
    fn empty_snapshots_keep_their_prefix() {
        assert_eq!(results_line(&[]), "RESULTS:");
        assert_eq!(history_line(&[]), "HISTORY:");
    }

    #[test]
    fn history_line_preserves_order() {
        let entries = vec![
            "Alice voted for Option A".to_string(),
            "Bob voted for Option B".to_string(),
        ];
        assert_eq!(
            history_line(&entries),
            "HISTORY:Alice voted for Option A|Bob voted for Option B|"
        );
    }

    #[test]
    fn reply_lines() {
        assert_eq!(vote_accepted("Option C"), "VOTE_ACCEPTED:Option C");
        assert_eq!(
            error_line("Invalid option: Bogus"),
            "ERROR:Invalid option: Bogus"
        );
    }
}
