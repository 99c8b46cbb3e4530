//! WebSocket keepalive pings.
//!
//! Viewers sit on the snapshot stream for hours without sending anything,
//! so idle-connection reaping (proxies, load balancers) would cut them off
//! unless some traffic flows. The heartbeat pings every registered viewer
//! on a fixed interval; a dead peer surfaces as a send error in its
//! connection tasks and gets cleaned up there.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Spawn the heartbeat loop.
///
/// Pings every connected viewer each `interval` until `cancel` is
/// triggered. Ticks with no viewers connected skip the ping.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    interval: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(
            interval_secs = interval.as_secs(),
            "WebSocket heartbeat started"
        );

        let mut ticker = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("WebSocket heartbeat stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let count = ws_manager.connection_count().await;
                    if count > 0 {
                        tracing::debug!(count, "WebSocket heartbeat ping");
                        ws_manager.ping_all().await;
                    }
                }
            }
        }
    })
}
