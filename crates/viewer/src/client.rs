//! Mirror synchronization driver.
//!
//! [`SyncClient`] owns the mirror and a [`watch`] channel of rendered
//! views. It refreshes the mirror on a poll interval, on server push
//! wakeups, and after every local command; between refreshes a one-second
//! tick keeps the countdowns moving.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::{mpsc, watch};

use crate::backend::BossBackend;
use crate::mirror::{BossMirror, BossView};

/// How often the roster is re-fetched even without a push wakeup.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Where the client stands relative to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No fetch attempted yet.
    Idle,
    /// A fetch is due or has failed; the mirror may be stale.
    Syncing,
    /// The mirror reflects the last successful fetch.
    Synced,
}

/// A user action to apply and confirm against the server.
#[derive(Debug, Clone)]
pub enum Command {
    Kill {
        name: String,
        killed_at: Option<DateTime<Utc>>,
    },
    Unkill {
        name: String,
    },
}

/// Drives a [`BossMirror`] against a [`BossBackend`].
pub struct SyncClient<B: BossBackend> {
    backend: B,
    mirror: BossMirror,
    state: SyncState,
    views_tx: watch::Sender<Vec<BossView>>,
}

impl<B: BossBackend> SyncClient<B> {
    /// Create a client and the receiver its rendered views arrive on.
    pub fn new(backend: B, display_offset: FixedOffset) -> (Self, watch::Receiver<Vec<BossView>>) {
        let (views_tx, views_rx) = watch::channel(Vec::new());
        let client = Self {
            backend,
            mirror: BossMirror::new(display_offset),
            state: SyncState::Idle,
            views_tx,
        };
        (client, views_rx)
    }

    /// Current sync state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Fetch the roster and replace the mirror with it.
    ///
    /// On failure the mirror keeps its last-known-good contents and the
    /// client stays in [`SyncState::Syncing`] until a fetch succeeds.
    pub async fn sync(&mut self) {
        self.state = SyncState::Syncing;
        match self.backend.list_all().await {
            Ok(bosses) => {
                self.mirror.apply_snapshot(bosses);
                self.state = SyncState::Synced;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Roster fetch failed, keeping last snapshot");
            }
        }
        self.render();
    }

    /// Record a kill: optimistic locally, then confirmed by a re-fetch.
    ///
    /// The kill time is clamped to "now" before it ever leaves the
    /// client; the server clamps again with its own clock.
    pub async fn kill(&mut self, name: &str, killed_at: Option<DateTime<Utc>>) {
        let now = Utc::now();
        let chosen = killed_at.unwrap_or(now).min(now);

        self.mirror.apply_optimistic(name, Some(chosen));
        self.render();

        if let Err(e) = self.backend.set_last_killed(name, Some(chosen)).await {
            tracing::warn!(boss = name, error = %e, "Kill write failed");
        }
        // Re-fetch either way: a success confirms the kill, a failure
        // rolls the optimistic entry back to the server's truth.
        self.sync().await;
    }

    /// Clear a recorded kill, mirroring [`kill`](SyncClient::kill).
    pub async fn unkill(&mut self, name: &str) {
        self.mirror.apply_optimistic(name, None);
        self.render();

        if let Err(e) = self.backend.set_last_killed(name, None).await {
            tracing::warn!(boss = name, error = %e, "Un-kill write failed");
        }
        self.sync().await;
    }

    /// Re-render countdowns at `now` without touching the server.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.state == SyncState::Synced {
            let _ = self.views_tx.send(self.mirror.views(now));
        }
    }

    /// Publish the current views to the watch channel.
    fn render(&self) {
        let _ = self.views_tx.send(self.mirror.views(Utc::now()));
    }

    /// Run the sync loop until the command channel closes.
    ///
    /// `push` carries wakeups from the WebSocket listener; each one
    /// triggers an immediate re-fetch. Polling continues regardless, so
    /// a dead push connection degrades latency, not correctness.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>, mut push: mpsc::Receiver<()>) {
        self.sync().await;

        let mut poll = tokio::time::interval_at(
            tokio::time::Instant::now() + DEFAULT_POLL_INTERVAL,
            DEFAULT_POLL_INTERVAL,
        );
        let mut ticker = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.sync().await;
                }
                _ = ticker.tick() => {
                    self.tick(Utc::now());
                }
                Some(()) = push.recv() => {
                    tracing::debug!("Push wakeup, re-fetching roster");
                    self.sync().await;
                }
                cmd = commands.recv() => {
                    match cmd {
                        Some(Command::Kill { name, killed_at }) => {
                            self.kill(&name, killed_at).await;
                        }
                        Some(Command::Unkill { name }) => {
                            self.unkill(&name).await;
                        }
                        None => {
                            tracing::info!("Command channel closed, sync client stopping");
                            break;
                        }
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
