//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`BossEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.
//! Every write path publishes here; the change feed subscribes and pushes
//! fresh snapshots to connected viewers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A boss record was created or edited.
pub const EVENT_BOSS_UPSERTED: &str = "boss.upserted";
/// A boss record was removed.
pub const EVENT_BOSS_DELETED: &str = "boss.deleted";
/// A kill was recorded for a boss.
pub const EVENT_BOSS_KILLED: &str = "boss.killed";
/// A recorded kill was cleared.
pub const EVENT_BOSS_UNKILLED: &str = "boss.unkilled";

// ---------------------------------------------------------------------------
// BossEvent
// ---------------------------------------------------------------------------

/// A change that occurred in the boss store.
///
/// Constructed via [`BossEvent::new`] and enriched with the builder
/// methods [`with_boss`](BossEvent::with_boss) and
/// [`with_payload`](BossEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossEvent {
    /// Dot-separated event name, e.g. `"boss.killed"`.
    pub event_type: String,

    /// Name of the boss the change applies to, when there is one.
    pub boss_name: Option<String>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl BossEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            boss_name: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the affected boss to the event.
    pub fn with_boss(mut self, name: impl Into<String>) -> Self {
        self.boss_name = Some(name.into());
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`BossEvent`].
///
/// # Usage
///
/// ```rust
/// use bosswatch_events::bus::{BossEvent, EventBus, EVENT_BOSS_KILLED};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(BossEvent::new(EVENT_BOSS_KILLED).with_boss("Venatus"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<BossEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`. Subscribers
    /// that only ever re-read the full list on wakeup (the change feed)
    /// lose nothing when this happens.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: BossEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<BossEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
