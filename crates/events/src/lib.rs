//! Bosswatch event bus and notification infrastructure.
//!
//! This crate provides the building blocks for change propagation:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`BossEvent`] — the canonical change event envelope.
//! - [`delivery`] — external delivery channels (Discord webhook).

pub mod bus;
pub mod delivery;

pub use bus::{BossEvent, EventBus};
pub use delivery::discord::DiscordNotifier;
