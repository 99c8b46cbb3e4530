//! Boss entity model and DTOs.

use bosswatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `bosses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Boss {
    pub id: DbId,
    pub name: String,
    pub level: i32,
    pub location: String,
    /// Persisted respawn grammar; parsed to a `RespawnRule` in memory.
    pub respawn_rule: String,
    /// `None` means never killed: the boss reads Alive with no countdown.
    pub last_killed: Option<Timestamp>,
    // -- Notification bookkeeping (respawn watcher) --
    pub notified_ten_minute: bool,
    pub notified_on_spawn: bool,
    /// Weekly-cycle marker: the occurrence the flags apply to.
    pub notified_cycle_at: Option<Timestamp>,
    /// Opaque reference to an externally stored image.
    pub image_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or updating a boss by name.
///
/// Fields left unset keep their current value on update and fall back to
/// column defaults on insert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertBoss {
    pub name: String,
    pub level: Option<i32>,
    pub location: Option<String>,
    pub respawn_rule: Option<String>,
    pub image_ref: Option<String>,
}
