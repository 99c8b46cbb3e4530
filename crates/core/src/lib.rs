//! Domain types and pure respawn logic for the bosswatch tracker.
//!
//! This crate does no I/O: the rule parser and the respawn clock are pure
//! functions over `chrono` timestamps, so the server, the respawn watcher,
//! and every viewer compute the same state from the same inputs.

pub mod clock;
pub mod error;
pub mod respawn;
pub mod types;
