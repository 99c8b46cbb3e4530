//! Change feed: turns store changes into full-roster snapshots.

mod change_feed;

pub use change_feed::{snapshot_message, ChangeFeed};
