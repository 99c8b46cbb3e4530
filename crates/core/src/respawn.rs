//! Respawn-rule grammar: parsing and canonical formatting.
//!
//! Rules are persisted as free text in one of two grammars:
//!
//! - fixed interval: `"24 Hour"` or `"4 Hour 30 Minute"`
//! - weekly schedule: comma-separated `"<Weekday> <HH>:<MM>"` entries,
//!   e.g. `"Monday 12:00, Friday 18:30"`
//!
//! Text matching neither grammar means "no timer": [`RespawnRule::parse`]
//! returns `None` and the boss is always displayed as Alive. The persisted
//! text stays the source of truth; everything downstream works on the
//! parsed [`RespawnRule`] so no other module ever string-matches.

use std::fmt;
use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;

/// Fixed-interval grammar: `<N> Hour`, optionally followed by `<M> Minute`.
static FIXED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*Hour(?:\s+(\d+)\s*Minute)?").expect("valid regex"));

/// One weekly entry: `<Weekday> <HH>:<MM>`, weekday name case-insensitive.
static WEEKLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\s+(\d{1,2}):(\d{2})$",
    )
    .expect("valid regex")
});

// ---------------------------------------------------------------------------
// RespawnRule
// ---------------------------------------------------------------------------

/// One scheduled weekly spawn time in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySlot {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

/// Structured respawn timing policy. Exactly one variant per rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespawnRule {
    /// Respawns a fixed duration after each kill.
    FixedInterval { total_minutes: i64 },
    /// Respawns at the next occurrence of any listed weekly slot,
    /// independent of kill events.
    Weekly { slots: Vec<WeeklySlot> },
}

impl RespawnRule {
    /// Parse persisted rule text.
    ///
    /// The fixed-interval grammar is tried first; otherwise the text is
    /// split on commas and each entry matched as a weekly slot. Malformed
    /// fragments inside the comma list are silently skipped. Text that
    /// yields neither variant returns `None`.
    pub fn parse(text: &str) -> Option<RespawnRule> {
        if let Some(caps) = FIXED_RE.captures(text) {
            let hours: i64 = caps[1].parse().ok()?;
            let minutes: i64 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            return Some(RespawnRule::FixedInterval {
                total_minutes: hours * 60 + minutes,
            });
        }

        let mut slots = Vec::new();
        for entry in text.split(',') {
            let Some(caps) = WEEKLY_RE.captures(entry.trim()) else {
                continue;
            };
            let (Ok(hour), Ok(minute)) = (caps[2].parse::<u32>(), caps[3].parse::<u32>()) else {
                continue;
            };
            if hour > 23 || minute > 59 {
                continue;
            }
            slots.push(WeeklySlot {
                weekday: parse_weekday(&caps[1]),
                hour,
                minute,
            });
        }

        if slots.is_empty() {
            None
        } else {
            Some(RespawnRule::Weekly { slots })
        }
    }
}

/// Renders the canonical persisted grammar, so editor output re-parses to
/// an equal rule.
impl fmt::Display for RespawnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespawnRule::FixedInterval { total_minutes } => {
                let hours = total_minutes / 60;
                let minutes = total_minutes % 60;
                if minutes > 0 {
                    write!(f, "{hours} Hour {minutes} Minute")
                } else {
                    write!(f, "{hours} Hour")
                }
            }
            RespawnRule::Weekly { slots } => {
                for (i, slot) in slots.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "{} {:02}:{:02}",
                        weekday_name(slot.weekday),
                        slot.hour,
                        slot.minute
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Full English weekday name, as used by the persisted grammar.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Inverse of [`weekday_name`]; callers pass regex-validated names only.
fn parse_weekday(name: &str) -> Weekday {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
