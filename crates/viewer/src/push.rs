//! WebSocket push listener.
//!
//! Connects to the server's snapshot stream and turns every text frame
//! into a wakeup on an mpsc channel. The listener never interprets the
//! frames; the sync client re-fetches over HTTP, so a missed or garbled
//! frame costs nothing.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Reconnection delay after a WebSocket failure.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Spawn the push listener task.
///
/// Runs until the wakeup channel closes, reconnecting with a fixed delay
/// whenever the connection drops.
pub fn spawn_push_listener(ws_url: String, wakeup: mpsc::Sender<()>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if wakeup.is_closed() {
                tracing::info!("Wakeup channel closed, push listener stopping");
                break;
            }

            tracing::info!(url = %ws_url, "Connecting to snapshot stream");
            match connect_async(&ws_url).await {
                Ok((ws_stream, _response)) => {
                    tracing::info!("Snapshot stream connected");
                    run_session(ws_stream, &wakeup).await;
                    tracing::warn!("Snapshot stream ended, reconnecting");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Snapshot stream connection failed");
                }
            }

            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

/// Drive a single WebSocket session, signalling a wakeup per text frame.
async fn run_session(
    ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    wakeup: &mpsc::Sender<()>,
) {
    let (_sink, mut stream) = ws_stream.split();

    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(_)) => {
                if wakeup.send(()).await.is_err() {
                    return;
                }
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Server closed snapshot stream");
                return;
            }
            Ok(_) => {
                // Binary / Frame — ignore.
            }
            Err(e) => {
                tracing::error!(error = %e, "Snapshot stream receive error");
                return;
            }
        }
    }
}
