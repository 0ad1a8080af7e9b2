//! Vote tally service
//!
//! Owns the shared voting state and serializes all mutations through one
//! lock. No other component reads or writes the tally, the per-client vote
//! records, or the history directly.

pub mod service;

pub use service::VoteService;
