//! Periodic respawn alerting.
//!
//! Scans the roster on a fixed interval and fires two Discord alerts per
//! respawn cycle: a 10-minute warning and a respawn announcement. The
//! `notified_*` flags in the store make each alert fire at most once per
//! cycle, even across restarts or multiple server instances.
//!
//! Interval bosses get a fresh cycle on every kill (the kill write clears
//! both flags). Schedule bosses respawn without anyone recording a kill,
//! so their cycles are tracked explicitly via `notified_cycle_at`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use bosswatch_core::clock::{self, BossState};
use bosswatch_core::respawn::RespawnRule;
use bosswatch_db::models::boss::Boss;
use bosswatch_db::repositories::BossRepo;
use bosswatch_events::DiscordNotifier;

/// Lead time for the pre-respawn warning.
const TEN_MINUTES_MS: i64 = 10 * 60 * 1000;

/// Run the respawn watcher loop.
///
/// Scans every `interval` until `cancel` is triggered. A scan failure is
/// logged and retried on the next tick.
pub async fn run(
    pool: PgPool,
    notifier: Option<Arc<DiscordNotifier>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        alerts_enabled = notifier.is_some(),
        "Respawn watcher started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Respawn watcher stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = check_once(&pool, notifier.as_ref()).await {
                    tracing::error!(error = %e, "Respawn scan failed");
                }
            }
        }
    }
}

/// Scan the roster once and fire any due alerts.
pub async fn check_once(
    pool: &PgPool,
    notifier: Option<&Arc<DiscordNotifier>>,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let bosses = BossRepo::list_all(pool).await?;

    for boss in &bosses {
        let Some(rule) = RespawnRule::parse(&boss.respawn_rule) else {
            continue;
        };

        match rule {
            RespawnRule::FixedInterval { .. } => {
                check_interval_boss(pool, notifier, boss, &rule, now).await?;
            }
            RespawnRule::Weekly { .. } => {
                check_schedule_boss(pool, notifier, boss, &rule, now).await?;
            }
        }
    }

    Ok(())
}

/// Alerts for a boss on a kill-driven interval.
///
/// Without a recorded kill there is no countdown, hence nothing to
/// announce. The kill write resets both flags, starting the cycle.
async fn check_interval_boss(
    pool: &PgPool,
    notifier: Option<&Arc<DiscordNotifier>>,
    boss: &Boss,
    rule: &RespawnRule,
    now: chrono::DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    if boss.last_killed.is_none() {
        return Ok(());
    }

    let status = clock::evaluate(Some(rule), boss.last_killed, now);

    if status.state == BossState::Dead
        && status.time_left_ms <= TEN_MINUTES_MS
        && !boss.notified_ten_minute
    {
        deliver(
            notifier,
            format!("⏰ **{}** respawns in 10 minutes!", boss.name),
        );
        BossRepo::mark_notified_ten_minute(pool, &boss.name).await?;
    }

    if status.state == BossState::Alive && !boss.notified_on_spawn {
        deliver(notifier, format!("🔔 **{}** has respawned!", boss.name));
        BossRepo::mark_notified_on_spawn(pool, &boss.name).await?;
    }

    Ok(())
}

/// Alerts for a boss on a weekly schedule.
///
/// Cycles roll over on their own, so the watcher tracks which occurrence
/// the flags belong to. When the tracked occurrence passes, the respawn
/// alert fires (if it has not already) and a new cycle begins against the
/// following occurrence.
async fn check_schedule_boss(
    pool: &PgPool,
    notifier: Option<&Arc<DiscordNotifier>>,
    boss: &Boss,
    rule: &RespawnRule,
    now: chrono::DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    let status = clock::evaluate(Some(rule), boss.last_killed, now);
    let Some(next) = status.next_respawn_at else {
        return Ok(());
    };

    match boss.notified_cycle_at {
        // The flags belong to the upcoming occurrence.
        Some(marker) if marker == next => {
            if status.time_left_ms > 0
                && status.time_left_ms <= TEN_MINUTES_MS
                && !boss.notified_ten_minute
            {
                deliver(
                    notifier,
                    format!("⏰ **{}** respawns in 10 minutes!", boss.name),
                );
                BossRepo::mark_notified_ten_minute(pool, &boss.name).await?;
            }
        }

        // The tracked occurrence has passed: announce it, then start
        // tracking the next one.
        Some(marker) if marker <= now => {
            if !boss.notified_on_spawn {
                deliver(notifier, format!("🔔 **{}** has respawned!", boss.name));
            }
            BossRepo::begin_notification_cycle(pool, &boss.name, next).await?;
        }

        // No cycle tracked yet (new boss, cleared kill, or edited rule).
        _ => {
            BossRepo::begin_notification_cycle(pool, &boss.name, next).await?;
        }
    }

    Ok(())
}

/// Send an alert when a notifier is configured; always log it.
fn deliver(notifier: Option<&Arc<DiscordNotifier>>, message: String) {
    tracing::info!(%message, "Respawn alert");
    if let Some(notifier) = notifier {
        notifier.notify(message);
    }
}
