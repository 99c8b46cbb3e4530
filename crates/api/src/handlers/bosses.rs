//! Handlers for the boss roster.
//!
//! Reads are public; every mutating endpoint requires [`DashboardAuth`].
//! Each successful write publishes a change event so the feed can push a
//! fresh snapshot to connected viewers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use bosswatch_core::error::CoreError;
use bosswatch_db::models::boss::{Boss, UpsertBoss};
use bosswatch_db::repositories::BossRepo;
use bosswatch_events::bus::{
    BossEvent, EVENT_BOSS_DELETED, EVENT_BOSS_KILLED, EVENT_BOSS_UNKILLED, EVENT_BOSS_UPSERTED,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::DashboardAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// API request types
// ---------------------------------------------------------------------------

/// Request body for recording a kill.
#[derive(Debug, Default, Deserialize)]
pub struct KillRequest {
    /// Kill time; defaults to "now" when omitted. Future values are
    /// clamped to the current time.
    pub killed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// GET /bosses
// ---------------------------------------------------------------------------

/// List the full roster, ordered by level then name.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Boss>>> {
    let bosses = BossRepo::list_all(&state.pool).await?;
    Ok(Json(bosses))
}

// ---------------------------------------------------------------------------
// POST /bosses
// ---------------------------------------------------------------------------

/// Create or update a boss, keyed on its name.
pub async fn upsert(
    State(state): State<AppState>,
    _auth: DashboardAuth,
    Json(body): Json<UpsertBoss>,
) -> AppResult<impl IntoResponse> {
    if body.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Boss name must not be empty".into(),
        )));
    }

    let boss = BossRepo::upsert(&state.pool, &body).await?;

    state
        .event_bus
        .publish(BossEvent::new(EVENT_BOSS_UPSERTED).with_boss(&boss.name));

    Ok((StatusCode::OK, Json(boss)))
}

// ---------------------------------------------------------------------------
// DELETE /bosses/{name}
// ---------------------------------------------------------------------------

/// Remove a boss from the roster.
pub async fn delete(
    State(state): State<AppState>,
    _auth: DashboardAuth,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = BossRepo::delete(&state.pool, &name).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Boss",
            name,
        }));
    }

    state
        .event_bus
        .publish(BossEvent::new(EVENT_BOSS_DELETED).with_boss(&name));

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /bosses/{name}/kill
// ---------------------------------------------------------------------------

/// Record a kill for a boss.
///
/// The effective time is the requested one clamped to "now"; the store
/// applies the same clamp against its own clock, which is authoritative.
pub async fn kill(
    State(state): State<AppState>,
    _auth: DashboardAuth,
    Path(name): Path<String>,
    Json(body): Json<KillRequest>,
) -> AppResult<Json<Boss>> {
    let now = Utc::now();
    let killed_at = body.killed_at.unwrap_or(now).min(now);

    let boss = BossRepo::set_last_killed(&state.pool, &name, Some(killed_at))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Boss",
            name: name.clone(),
        }))?;

    state.event_bus.publish(
        BossEvent::new(EVENT_BOSS_KILLED)
            .with_boss(&name)
            .with_payload(serde_json::json!({ "killed_at": boss.last_killed })),
    );

    Ok(Json(boss))
}

// ---------------------------------------------------------------------------
// POST /bosses/{name}/unkill
// ---------------------------------------------------------------------------

/// Clear a recorded kill, returning the boss to its unkilled state.
pub async fn unkill(
    State(state): State<AppState>,
    _auth: DashboardAuth,
    Path(name): Path<String>,
) -> AppResult<Json<Boss>> {
    let boss = BossRepo::set_last_killed(&state.pool, &name, None)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Boss",
            name: name.clone(),
        }))?;

    state
        .event_bus
        .publish(BossEvent::new(EVENT_BOSS_UNKILLED).with_boss(&name));

    Ok(Json(boss))
}
