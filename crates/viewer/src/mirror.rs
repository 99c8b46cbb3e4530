//! Local mirror of the server roster, with an optimistic overlay.
//!
//! The mirror holds the last snapshot received from the server plus a
//! per-boss overlay of kill times the user has entered locally but the
//! server has not yet confirmed. Views are evaluated on demand so
//! countdowns tick without any further server traffic.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, Utc};

use bosswatch_core::clock::{self, BossState};
use bosswatch_core::respawn::RespawnRule;

use crate::backend::BossRecord;

/// A row ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossView {
    pub name: String,
    pub level: i32,
    pub location: String,
    pub respawn_rule: String,
    pub state: BossState,
    /// "Alive", or a human-readable time-left string.
    pub countdown: String,
    /// Next respawn in the display timezone, when one is known.
    pub next_respawn_at: Option<DateTime<FixedOffset>>,
}

/// The mirrored roster.
pub struct BossMirror {
    bosses: Vec<BossRecord>,
    /// Locally entered kill times awaiting server confirmation,
    /// keyed by boss name. `None` means a pending un-kill.
    overlay: HashMap<String, Option<DateTime<Utc>>>,
    display_offset: FixedOffset,
}

impl BossMirror {
    /// Create an empty mirror rendering times in `display_offset`.
    pub fn new(display_offset: FixedOffset) -> Self {
        Self {
            bosses: Vec::new(),
            overlay: HashMap::new(),
            display_offset,
        }
    }

    /// Replace the roster with a server snapshot.
    ///
    /// The snapshot is authoritative, so any optimistic overlay entries
    /// are dropped. A write the server accepted is reflected in the
    /// snapshot; one it rejected is correctly rolled back.
    pub fn apply_snapshot(&mut self, bosses: Vec<BossRecord>) {
        self.bosses = bosses;
        self.overlay.clear();
    }

    /// Record a local kill (or un-kill) ahead of server confirmation.
    pub fn apply_optimistic(&mut self, name: &str, killed_at: Option<DateTime<Utc>>) {
        self.overlay.insert(name.to_string(), killed_at);
    }

    /// Whether the mirror has received any snapshot yet.
    pub fn is_empty(&self) -> bool {
        self.bosses.is_empty()
    }

    /// Evaluate every boss at `now` and return render-ready rows.
    pub fn views(&self, now: DateTime<Utc>) -> Vec<BossView> {
        self.bosses
            .iter()
            .map(|boss| {
                let last_killed = self
                    .overlay
                    .get(&boss.name)
                    .copied()
                    .unwrap_or(boss.last_killed);

                let rule = RespawnRule::parse(&boss.respawn_rule);
                let status = clock::evaluate(rule.as_ref(), last_killed, now);

                let countdown = match status.state {
                    BossState::Alive => "Alive".to_string(),
                    BossState::Dead => clock::format_time_left(status.time_left_ms),
                };

                BossView {
                    name: boss.name.clone(),
                    level: boss.level,
                    location: boss.location.clone(),
                    respawn_rule: boss.respawn_rule.clone(),
                    state: status.state,
                    countdown,
                    next_respawn_at: status
                        .next_respawn_at
                        .map(|ts| ts.with_timezone(&self.display_offset)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(name: &str, rule: &str, last_killed: Option<DateTime<Utc>>) -> BossRecord {
        BossRecord {
            name: name.to_string(),
            level: 140,
            location: "Leafre Forest".to_string(),
            respawn_rule: rule.to_string(),
            last_killed,
        }
    }

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    #[test]
    fn unkilled_boss_renders_alive() {
        let mut mirror = BossMirror::new(offset());
        mirror.apply_snapshot(vec![record("Venatus", "24 Hour", None)]);

        let views = mirror.views(Utc::now());
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].state, BossState::Alive);
        assert_eq!(views[0].countdown, "Alive");
    }

    #[test]
    fn killed_boss_renders_countdown() {
        let now = Utc::now();
        let mut mirror = BossMirror::new(offset());
        mirror.apply_snapshot(vec![record(
            "Venatus",
            "24 Hour",
            Some(now - Duration::hours(1)),
        )]);

        let views = mirror.views(now);
        assert_eq!(views[0].state, BossState::Dead);
        assert_eq!(views[0].countdown, "23 hours, 0 seconds");
        let next = views[0].next_respawn_at.expect("respawn time known");
        assert_eq!(next.with_timezone(&Utc), now + Duration::hours(23));
    }

    #[test]
    fn overlay_takes_precedence_until_snapshot() {
        let now = Utc::now();
        let mut mirror = BossMirror::new(offset());
        mirror.apply_snapshot(vec![record("Venatus", "24 Hour", None)]);

        mirror.apply_optimistic("Venatus", Some(now));
        assert_eq!(mirror.views(now)[0].state, BossState::Dead);

        // The next snapshot is authoritative and drops the overlay.
        mirror.apply_snapshot(vec![record("Venatus", "24 Hour", None)]);
        assert_eq!(mirror.views(now)[0].state, BossState::Alive);
    }

    #[test]
    fn pending_unkill_overrides_snapshot_kill() {
        let now = Utc::now();
        let mut mirror = BossMirror::new(offset());
        mirror.apply_snapshot(vec![record(
            "Venatus",
            "24 Hour",
            Some(now - Duration::hours(1)),
        )]);

        mirror.apply_optimistic("Venatus", None);
        assert_eq!(mirror.views(now)[0].state, BossState::Alive);
    }
}
