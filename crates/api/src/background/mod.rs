//! Long-running background tasks spawned from `main`.

pub mod respawn_watcher;
