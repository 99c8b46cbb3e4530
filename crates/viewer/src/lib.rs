//! Bosswatch terminal viewer.
//!
//! Keeps a local mirror of the boss roster in sync with a bosswatch
//! server and renders live countdowns from it. The mirror is refreshed
//! by periodic polling plus server push over WebSocket; kills typed at
//! the terminal are applied optimistically and then confirmed against
//! the server.

pub mod backend;
pub mod client;
pub mod mirror;
pub mod push;
