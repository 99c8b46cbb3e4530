//! Bosswatch HTTP and WebSocket server.
//!
//! Exposes the boss roster over a small REST surface, pushes full-list
//! snapshots to connected viewers whenever the store changes, and runs the
//! respawn watcher that fires Discord alerts.

pub mod background;
pub mod config;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
