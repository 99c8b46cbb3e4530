//! Repository for the `bosses` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::boss::{Boss, UpsertBoss};

// ---------------------------------------------------------------------------
// Column list
// ---------------------------------------------------------------------------

const BOSS_COLUMNS: &str = "\
    id, name, level, location, respawn_rule, last_killed, \
    notified_ten_minute, notified_on_spawn, notified_cycle_at, \
    image_ref, created_at, updated_at";

/// Provides CRUD operations for bosses.
///
/// Writes are last-write-wins: the database serializes statements per row
/// and the latest accepted write becomes authoritative for every viewer on
/// its next sync. There is no optimistic locking anywhere in this layer.
pub struct BossRepo;

impl BossRepo {
    /// List every boss, ordered by level then name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Boss>, sqlx::Error> {
        let query = format!("SELECT {BOSS_COLUMNS} FROM bosses ORDER BY level, name");
        sqlx::query_as::<_, Boss>(&query).fetch_all(pool).await
    }

    /// Find a boss by its unique name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Boss>, sqlx::Error> {
        let query = format!("SELECT {BOSS_COLUMNS} FROM bosses WHERE name = $1");
        sqlx::query_as::<_, Boss>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a boss keyed on its name.
    ///
    /// `COALESCE` keeps the existing value for every field the DTO leaves
    /// unset, so a partial edit never nulls out the rest of the record.
    pub async fn upsert(pool: &PgPool, input: &UpsertBoss) -> Result<Boss, sqlx::Error> {
        let query = format!(
            "INSERT INTO bosses (name, level, location, respawn_rule, image_ref) \
             VALUES ($1, COALESCE($2, 0), COALESCE($3, ''), COALESCE($4, ''), $5) \
             ON CONFLICT (name) DO UPDATE SET \
                 level = COALESCE($2, bosses.level), \
                 location = COALESCE($3, bosses.location), \
                 respawn_rule = COALESCE($4, bosses.respawn_rule), \
                 image_ref = COALESCE($5, bosses.image_ref), \
                 updated_at = now() \
             RETURNING {BOSS_COLUMNS}"
        );
        sqlx::query_as::<_, Boss>(&query)
            .bind(&input.name)
            .bind(input.level)
            .bind(input.location.as_deref())
            .bind(input.respawn_rule.as_deref())
            .bind(input.image_ref.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Delete a boss by name. Returns `false` when no row matched.
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bosses WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a kill (or clear one, with `None`).
    ///
    /// The kill time is clamped to the database clock so a client can never
    /// store a future kill, and both notification flags plus the weekly
    /// cycle marker reset in the same statement, keeping the update atomic.
    /// Returns the authoritative row, or `None` when the boss is missing.
    pub async fn set_last_killed(
        pool: &PgPool,
        name: &str,
        killed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Boss>, sqlx::Error> {
        let query = format!(
            "UPDATE bosses SET \
                 last_killed = CASE WHEN $2::timestamptz IS NULL \
                                    THEN NULL ELSE LEAST($2, now()) END, \
                 notified_ten_minute = FALSE, \
                 notified_on_spawn = FALSE, \
                 notified_cycle_at = NULL, \
                 updated_at = now() \
             WHERE name = $1 \
             RETURNING {BOSS_COLUMNS}"
        );
        sqlx::query_as::<_, Boss>(&query)
            .bind(name)
            .bind(killed_at)
            .fetch_optional(pool)
            .await
    }

    /// Mark the 10-minute warning as sent for the current cycle.
    pub async fn mark_notified_ten_minute(pool: &PgPool, name: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bosses SET notified_ten_minute = TRUE, updated_at = now() WHERE name = $1",
        )
        .bind(name)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark the respawn alert as sent for the current cycle.
    pub async fn mark_notified_on_spawn(pool: &PgPool, name: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bosses SET notified_on_spawn = TRUE, updated_at = now() WHERE name = $1",
        )
        .bind(name)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Start a fresh notification cycle for a schedule-driven boss.
    ///
    /// Clears both flags and records the occurrence they now apply to.
    pub async fn begin_notification_cycle(
        pool: &PgPool,
        name: &str,
        cycle_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bosses SET \
                 notified_ten_minute = FALSE, \
                 notified_on_spawn = FALSE, \
                 notified_cycle_at = $2, \
                 updated_at = now() \
             WHERE name = $1",
        )
        .bind(name)
        .bind(cycle_at)
        .execute(pool)
        .await?;
        Ok(())
    }
}
