use sqlx::PgPool;

use bosswatch_core::respawn::RespawnRule;
use bosswatch_db::models::boss::UpsertBoss;
use bosswatch_db::repositories::BossRepo;
use bosswatch_db::seed::{seed_default_roster, DEFAULT_ROSTER};

#[sqlx::test]
async fn seed_fills_an_empty_roster_once(pool: PgPool) {
    let inserted = seed_default_roster(&pool).await.unwrap();
    assert_eq!(inserted as usize, DEFAULT_ROSTER.len());

    let bosses = BossRepo::list_all(&pool).await.unwrap();
    assert_eq!(bosses.len(), DEFAULT_ROSTER.len());
    // Seeded bosses start without a recorded kill.
    assert!(bosses.iter().all(|b| b.last_killed.is_none()));

    // A second run is a no-op.
    let inserted = seed_default_roster(&pool).await.unwrap();
    assert_eq!(inserted, 0);
    assert_eq!(
        BossRepo::list_all(&pool).await.unwrap().len(),
        DEFAULT_ROSTER.len()
    );
}

#[sqlx::test]
async fn seed_leaves_an_edited_roster_alone(pool: PgPool) {
    let input = UpsertBoss {
        name: "Custom Boss".to_string(),
        level: Some(1),
        location: Some("Somewhere".to_string()),
        respawn_rule: Some("12 Hour".to_string()),
        image_ref: None,
    };
    BossRepo::upsert(&pool, &input).await.unwrap();

    let inserted = seed_default_roster(&pool).await.unwrap();
    assert_eq!(inserted, 0);

    let bosses = BossRepo::list_all(&pool).await.unwrap();
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].name, "Custom Boss");
}

#[test]
fn every_seeded_rule_parses() {
    for (name, _, _, rule) in DEFAULT_ROSTER {
        assert!(
            RespawnRule::parse(rule).is_some(),
            "rule for {name} should parse: {rule}"
        );
    }
}
