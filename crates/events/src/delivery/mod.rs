//! External delivery channels for boss notifications.
//!
//! Currently a single channel: Discord webhook messages pushed by the
//! respawn watcher.

pub mod discord;
