//! Module `service`
//!
//! Implements the shared vote-tally state machine: the tally, the
//! per-session current-vote records, and the append-only history, all
//! guarded by a single mutex. A cast runs its entire
//! validate-decrement-increment-record sequence inside one critical
//! section, so concurrent casts from different sessions are fully
//! serialized.

use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::VoteError;

/// Shared vote-tally service.
///
/// The option set is fixed at construction and immutable for the lifetime
/// of the service; every option always has a tally entry, including at
/// zero.
pub struct VoteService {
    state: Mutex<VoteState>,
    options: Vec<String>,
}

/// The mutable containers; only reachable through the service's lock.
struct VoteState {
    tally: HashMap<String, u64>,
    voters: HashMap<String, String>,
    history: Vec<String>,
}

impl VoteService {
    /// Creates a service over the given fixed option set.
    pub fn new(options: &[String]) -> Self {
        let tally = options.iter().map(|option| (option.clone(), 0)).collect();
        Self {
            state: Mutex::new(VoteState {
                tally,
                voters: HashMap::new(),
                history: Vec::new(),
            }),
            options: options.to_vec(),
        }
    }

    /// Returns the fixed option set.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Records a vote for `option` by the session identified by
    /// `session_id`.
    ///
    /// If the session already holds a vote, its previous option is
    /// decremented before the new one is incremented (a change). Exactly
    /// one history entry is appended per successful call; the entry text
    /// is the same for a first vote and a change. An unknown option fails
    /// with no mutation at all.
    pub async fn cast_vote(
        &self,
        session_id: &str,
        display_name: &str,
        option: &str,
    ) -> Result<(), VoteError> {
        if !self.options.iter().any(|known| known == option) {
            return Err(VoteError::InvalidOption(option.to_string()));
        }

        let mut state = self.state.lock().await;

        if let Some(previous) = state
            .voters
            .insert(session_id.to_string(), option.to_string())
        {
            if let Some(count) = state.tally.get_mut(&previous) {
                *count = count.saturating_sub(1);
            }
        }

        *state.tally.entry(option.to_string()).or_insert(0) += 1;

        state
            .history
            .push(format!("{} voted for {}", display_name, option));

        Ok(())
    }

    /// Returns a consistent snapshot of the tally.
    ///
    /// Iteration order is not guaranteed stable across calls.
    pub async fn results(&self) -> Vec<(String, u64)> {
        let state = self.state.lock().await;
        state
            .tally
            .iter()
            .map(|(option, count)| (option.clone(), *count))
            .collect()
    }

    /// Returns the full history in chronological order.
    pub async fn history(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.history.clone()
    }

    /// Number of distinct sessions currently holding a vote record.
    pub async fn total_votes(&self) -> usize {
        let state = self.state.lock().await;
        state.voters.len()
    }

    /// Zeroes the tally and clears vote records and history.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.tally = self.options.iter().map(|option| (option.clone(), 0)).collect();
        state.voters.clear();
        state.history.clear();
    }
}
