//! Event-to-snapshot fan-out.
//!
//! [`ChangeFeed`] subscribes to the event bus and, for every change,
//! re-reads the full roster and broadcasts it to all connected viewers.
//! Pushing the whole list instead of deltas keeps every viewer trivially
//! consistent: whatever it last received is a complete, ordered roster.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;

use bosswatch_db::models::boss::Boss;
use bosswatch_db::repositories::BossRepo;
use bosswatch_db::DbPool;
use bosswatch_events::BossEvent;

use crate::ws::WsManager;

/// Build a snapshot frame from the current roster.
pub fn snapshot_message(bosses: &[Boss]) -> Message {
    let payload = serde_json::json!({
        "type": "snapshot",
        "bosses": bosses,
        "timestamp": chrono::Utc::now(),
    });
    Message::Text(payload.to_string().into())
}

/// Pushes a fresh roster snapshot to every viewer on each store change.
pub struct ChangeFeed {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl ChangeFeed {
    /// Create a feed over the given pool and connection manager.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the main feed loop.
    ///
    /// Subscribes to the event bus via `receiver` and pushes one snapshot
    /// per received event. The loop exits when the channel is closed (i.e.
    /// the [`EventBus`](bosswatch_events::EventBus) is dropped).
    ///
    /// A lagged receiver is harmless here: the next snapshot push reads
    /// the current roster, so skipped events cost nothing but latency.
    pub async fn run(self, mut receiver: broadcast::Receiver<BossEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::debug!(event_type = %event.event_type, "Store changed, pushing snapshot");
                    self.push_snapshot().await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Change feed lagged, pushing snapshot");
                    self.push_snapshot().await;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, change feed shutting down");
                    break;
                }
            }
        }
    }

    /// Read the current roster and broadcast it to all viewers.
    async fn push_snapshot(&self) {
        match BossRepo::list_all(&self.pool).await {
            Ok(bosses) => {
                self.ws_manager.broadcast(snapshot_message(&bosses)).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load roster for snapshot push");
            }
        }
    }
}
