//! Pure respawn-state evaluation.
//!
//! [`evaluate`] derives a boss's live/dead state and time-until-respawn
//! from its parsed rule and last-kill timestamp at a given query instant.
//! It is a pure function: the server, the respawn watcher, and every
//! viewer call it with their own `now` and agree on the result.
//!
//! Weekly schedules are authored and evaluated in a fixed reference
//! offset (UTC+8). Viewer-local timezones only shift how a timestamp is
//! displayed, never which slot is next.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};
use serde::Serialize;

use crate::respawn::{RespawnRule, WeeklySlot};
use crate::types::Timestamp;

/// Reference offset for weekly schedules: UTC+8.
pub const REFERENCE_OFFSET_HOURS: i32 = 8;

/// How long a schedule-driven boss is shown Alive after each occurrence.
///
/// Weekly bosses have no kill tracking, so "alive" cannot end on a kill
/// event; the window approximates how long the boss plausibly stays up
/// before the countdown to the next occurrence takes over the display.
pub const WEEKLY_ALIVE_WINDOW_MS: i64 = 60 * 60 * 1000;

/// Whether a boss is currently up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BossState {
    Alive,
    Dead,
}

impl fmt::Display for BossState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BossState::Alive => write!(f, "Alive"),
            BossState::Dead => write!(f, "Dead"),
        }
    }
}

/// Result of one clock evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RespawnStatus {
    pub state: BossState,
    /// Milliseconds until the next respawn; 0 when none is pending.
    pub time_left_ms: i64,
    /// The next respawn instant, when the rule defines one.
    pub next_respawn_at: Option<Timestamp>,
}

impl RespawnStatus {
    /// Alive with no countdown: the default for unruled or unkilled bosses.
    fn alive() -> Self {
        Self {
            state: BossState::Alive,
            time_left_ms: 0,
            next_respawn_at: None,
        }
    }
}

/// Evaluate a boss's respawn state at `now`.
///
/// - No rule: always Alive, no countdown.
/// - Fixed interval: counts down from `last_killed`; never killed means
///   Alive with no countdown.
/// - Weekly: counts down to the next slot occurrence in the reference
///   timezone, ignoring `last_killed` entirely. The boss reads Alive for
///   [`WEEKLY_ALIVE_WINDOW_MS`] after each occurrence, then Dead with the
///   countdown to the following one.
pub fn evaluate(
    rule: Option<&RespawnRule>,
    last_killed: Option<Timestamp>,
    now: Timestamp,
) -> RespawnStatus {
    match rule {
        None => RespawnStatus::alive(),

        Some(RespawnRule::FixedInterval { total_minutes }) => {
            let Some(killed) = last_killed else {
                return RespawnStatus::alive();
            };
            let respawn_ms = total_minutes * 60_000;
            let elapsed_ms = (now - killed).num_milliseconds().max(0);
            let time_left_ms = (respawn_ms - elapsed_ms).max(0);
            RespawnStatus {
                state: if time_left_ms > 0 {
                    BossState::Dead
                } else {
                    BossState::Alive
                },
                time_left_ms,
                next_respawn_at: Some(killed + Duration::milliseconds(respawn_ms)),
            }
        }

        Some(RespawnRule::Weekly { slots }) => {
            let (previous, next) = weekly_window(slots, now);
            let time_left_ms = (next - now).num_milliseconds().max(0);
            let since_previous_ms = (now - previous).num_milliseconds();
            let state = if time_left_ms == 0 || since_previous_ms < WEEKLY_ALIVE_WINDOW_MS {
                BossState::Alive
            } else {
                BossState::Dead
            };
            RespawnStatus {
                state,
                time_left_ms,
                next_respawn_at: Some(next),
            }
        }
    }
}

/// The most recent occurrence at or before `now` and the next occurrence
/// at or after `now`, across all slots, in UTC.
fn weekly_window(slots: &[WeeklySlot], now: Timestamp) -> (Timestamp, Timestamp) {
    let offset =
        FixedOffset::east_opt(REFERENCE_OFFSET_HOURS * 3600).expect("UTC+8 is a valid offset");
    let local_now = now.with_timezone(&offset);

    let mut previous: Option<DateTime<FixedOffset>> = None;
    let mut next: Option<DateTime<FixedOffset>> = None;

    for slot in slots {
        let days_ahead = (slot.weekday.num_days_from_sunday() as i64
            - local_now.weekday().num_days_from_sunday() as i64)
            .rem_euclid(7);
        let day = local_now.date_naive() + Duration::days(days_ahead);
        let naive = day
            .and_hms_opt(slot.hour, slot.minute, 0)
            .expect("slot times are validated at parse time");
        let mut candidate = offset
            .from_local_datetime(&naive)
            .single()
            .expect("fixed offsets have no DST gaps");

        // Slots are 7-day periodic, so the previous occurrence is exactly
        // one week behind the next one.
        if candidate < local_now {
            candidate += Duration::days(7);
        }
        let candidate_prev = candidate - Duration::days(7);

        if next.is_none_or(|n| candidate < n) {
            next = Some(candidate);
        }
        if previous.is_none_or(|p| candidate_prev > p) {
            previous = Some(candidate_prev);
        }
    }

    // The parser guarantees at least one slot per Weekly rule.
    let next = next.expect("weekly rules always carry at least one slot");
    let previous = previous.expect("weekly rules always carry at least one slot");
    (previous.with_timezone(&Utc), next.with_timezone(&Utc))
}

/// Render a countdown as `"N days, N hours, N minutes, N seconds"`.
///
/// Zero-valued days/hours/minutes are omitted; seconds always appear,
/// even as `"0 seconds"`.
pub fn format_time_left(ms: i64) -> String {
    let mut secs = (ms / 1000).max(0);

    let days = secs / 86_400;
    secs %= 86_400;
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    let seconds = secs % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(plural(days, "day"));
    }
    if hours > 0 {
        parts.push(plural(hours, "hour"));
    }
    if minutes > 0 {
        parts.push(plural(minutes, "minute"));
    }
    parts.push(plural(seconds, "second"));

    parts.join(", ")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
