//! `bosswatch-viewer` -- terminal roster viewer.
//!
//! Mirrors a bosswatch server's roster, renders live countdowns, and
//! accepts kill commands on stdin:
//!
//! ```text
//! kill <name>      record a kill now
//! unkill <name>    clear a recorded kill
//! quit             exit
//! ```
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                      |
//! |------------------------|----------|-------------------------|----------------------------------|
//! | `BOSSWATCH_URL`        | no       | `http://localhost:3000` | Server base URL                  |
//! | `DASHBOARD_PASSWORD`   | no       | `change-me`             | Shared password for writes       |
//! | `DISPLAY_OFFSET_HOURS` | no       | `8`                     | Timezone offset for shown times  |

use chrono::FixedOffset;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bosswatch_viewer::backend::HttpBackend;
use bosswatch_viewer::client::{Command, SyncClient};
use bosswatch_viewer::mirror::BossView;
use bosswatch_viewer::push;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bosswatch_viewer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url =
        std::env::var("BOSSWATCH_URL").unwrap_or_else(|_| "http://localhost:3000".into());
    let password = std::env::var("DASHBOARD_PASSWORD").unwrap_or_else(|_| "change-me".into());

    let offset_hours: i32 = std::env::var("DISPLAY_OFFSET_HOURS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8);
    let display_offset = FixedOffset::east_opt(offset_hours * 3600)
        .expect("DISPLAY_OFFSET_HOURS must be a valid UTC offset");

    let ws_url = format!(
        "{}/api/v1/stream",
        base_url
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1)
    );

    tracing::info!(url = %base_url, offset_hours, "Starting bosswatch-viewer");

    let backend = HttpBackend::new(base_url, password);
    let (client, mut views) = SyncClient::new(backend, display_offset);

    let (command_tx, command_rx) = mpsc::channel::<Command>(16);
    let (wakeup_tx, wakeup_rx) = mpsc::channel::<()>(16);

    let push_handle = push::spawn_push_listener(ws_url, wakeup_tx);
    let client_handle = tokio::spawn(client.run(command_rx, wakeup_rx));

    // Stdin command loop on this task; closing the command channel (on
    // "quit" or EOF) stops the sync client.
    let stdin_task = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("kill"), Some(name)) => {
                    let _ = command_tx
                        .send(Command::Kill {
                            name: name.to_string(),
                            killed_at: None,
                        })
                        .await;
                }
                (Some("unkill"), Some(name)) => {
                    let _ = command_tx
                        .send(Command::Unkill {
                            name: name.to_string(),
                        })
                        .await;
                }
                (Some("quit"), _) => break,
                (Some(other), _) => {
                    eprintln!("Unknown command: {other} (try: kill <name>, unkill <name>, quit)");
                }
                (None, _) => {}
            }
        }
    });

    // Render loop: redraw whenever the client publishes fresh views.
    while views.changed().await.is_ok() {
        render(&views.borrow());
        if client_handle.is_finished() {
            break;
        }
    }

    stdin_task.abort();
    push_handle.abort();
    let _ = client_handle.await;
    tracing::info!("Viewer stopped");
}

/// Print the roster as a fixed-width table.
fn render(views: &[BossView]) {
    // ANSI clear screen + cursor home.
    print!("\x1b[2J\x1b[H");
    println!(
        "{:<20} {:>5}  {:<20} {:<22} {:<6} {}",
        "BOSS", "LVL", "LOCATION", "RULE", "STATE", "COUNTDOWN"
    );
    for view in views {
        let next = view
            .next_respawn_at
            .map(|ts| format!("  (next: {})", ts.format("%a %H:%M")))
            .unwrap_or_default();
        println!(
            "{:<20} {:>5}  {:<20} {:<22} {:<6} {}{}",
            view.name, view.level, view.location, view.respawn_rule, view.state, view.countdown, next
        );
    }
}
