//! Integration tests for the respawn watcher scan.
//!
//! The Discord notifier is left unconfigured; these tests assert on the
//! notification flags the scan writes back to the store.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use bosswatch_api::background::respawn_watcher;
use bosswatch_db::models::boss::UpsertBoss;
use bosswatch_db::repositories::BossRepo;

async fn seed_boss(pool: &PgPool, name: &str, rule: &str) {
    let input = UpsertBoss {
        name: name.to_string(),
        level: Some(140),
        location: Some("Leafre Forest".to_string()),
        respawn_rule: Some(rule.to_string()),
        image_ref: None,
    };
    BossRepo::upsert(pool, &input).await.unwrap();
}

#[sqlx::test(migrations = "../db/migrations")]
async fn interval_boss_gets_ten_minute_warning(pool: PgPool) {
    seed_boss(&pool, "Venatus", "24 Hour").await;
    // Killed 23h51m ago, so the respawn is 9 minutes out.
    BossRepo::set_last_killed(
        &pool,
        "Venatus",
        Some(Utc::now() - Duration::hours(23) - Duration::minutes(51)),
    )
    .await
    .unwrap();

    respawn_watcher::check_once(&pool, None).await.unwrap();

    let boss = BossRepo::find_by_name(&pool, "Venatus")
        .await
        .unwrap()
        .unwrap();
    assert!(boss.notified_ten_minute);
    assert!(!boss.notified_on_spawn);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn interval_boss_gets_spawn_alert_once(pool: PgPool) {
    seed_boss(&pool, "Venatus", "24 Hour").await;
    BossRepo::set_last_killed(&pool, "Venatus", Some(Utc::now() - Duration::hours(25)))
        .await
        .unwrap();

    respawn_watcher::check_once(&pool, None).await.unwrap();

    let boss = BossRepo::find_by_name(&pool, "Venatus")
        .await
        .unwrap()
        .unwrap();
    assert!(boss.notified_on_spawn);

    // A second scan must not reset or re-fire anything.
    respawn_watcher::check_once(&pool, None).await.unwrap();
    let boss = BossRepo::find_by_name(&pool, "Venatus")
        .await
        .unwrap()
        .unwrap();
    assert!(boss.notified_on_spawn);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unkilled_interval_boss_is_left_alone(pool: PgPool) {
    seed_boss(&pool, "Venatus", "24 Hour").await;

    respawn_watcher::check_once(&pool, None).await.unwrap();

    let boss = BossRepo::find_by_name(&pool, "Venatus")
        .await
        .unwrap()
        .unwrap();
    assert!(!boss.notified_ten_minute);
    assert!(!boss.notified_on_spawn);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unparseable_rule_is_skipped(pool: PgPool) {
    seed_boss(&pool, "Mystery", "whenever it feels like it").await;
    BossRepo::set_last_killed(&pool, "Mystery", Some(Utc::now() - Duration::hours(30)))
        .await
        .unwrap();

    respawn_watcher::check_once(&pool, None).await.unwrap();

    let boss = BossRepo::find_by_name(&pool, "Mystery")
        .await
        .unwrap()
        .unwrap();
    assert!(!boss.notified_ten_minute);
    assert!(!boss.notified_on_spawn);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn schedule_boss_starts_a_tracked_cycle(pool: PgPool) {
    // Pick a slot a few days out so the occurrence is nowhere near "now"
    // regardless of when the test runs.
    let offset = chrono::FixedOffset::east_opt(8 * 3600).unwrap();
    let weekday = (Utc::now() + Duration::days(3))
        .with_timezone(&offset)
        .format("%A")
        .to_string();
    seed_boss(&pool, "Auraq", &format!("{weekday} 12:00")).await;

    respawn_watcher::check_once(&pool, None).await.unwrap();

    let boss = BossRepo::find_by_name(&pool, "Auraq")
        .await
        .unwrap()
        .unwrap();
    let marker = boss.notified_cycle_at.expect("cycle should be tracked");
    assert!(marker > Utc::now());
    assert!(!boss.notified_ten_minute);
    assert!(!boss.notified_on_spawn);

    // The marker is stable across scans within the same cycle.
    respawn_watcher::check_once(&pool, None).await.unwrap();
    let boss = BossRepo::find_by_name(&pool, "Auraq")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(boss.notified_cycle_at, Some(marker));
}
