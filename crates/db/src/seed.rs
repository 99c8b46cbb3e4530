//! Default roster bootstrap.
//!
//! A fresh deployment starts with the twenty field bosses the tracker was
//! built around. Seeding only runs against an empty `bosses` table, so it
//! never touches a roster that operators have since edited.

use sqlx::PgPool;

/// The default field-boss roster: (name, location, level, respawn rule).
pub const DEFAULT_ROSTER: [(&str, &str, i32, &str); 20] = [
    ("Venatus", "Leafre Forest", 135, "24 Hour"),
    ("Livera", "Leafre Forest", 135, "24 Hour"),
    ("Neutro", "Leafre Forest", 135, "24 Hour"),
    ("Lady Dalia", "Leafre Forest", 135, "24 Hour"),
    ("Thymele", "Leafre Forest", 135, "24 Hour"),
    ("Baron Braudmore", "Leafre Forest", 140, "Monday 12:00, Friday 12:00"),
    ("Milavy", "Deep Sea", 150, "24 Hour"),
    ("Wannitas", "Deep Sea", 150, "24 Hour"),
    ("Duplican", "Tower of Oz", 155, "Monday 12:00, Friday 12:00"),
    ("Shuliar", "Tower of Oz", 155, "Monday 12:00, Friday 12:00"),
    ("Roderick", "Tower of Oz", 155, "Monday 12:00, Friday 12:00"),
    ("Titore", "Tower of Oz", 155, "Monday 12:00, Friday 12:00"),
    ("Larba", "Tower of Oz", 160, "Saturday 18:00"),
    ("Catena", "Ancient Ruins", 165, "Sunday 18:00"),
    ("Auraq", "Ancient Ruins", 165, "Saturday 18:00"),
    ("Secreta", "Ancient Ruins", 170, "Saturday 18:00"),
    ("Ordo", "Ancient Ruins", 170, "Sunday 18:00"),
    ("Asta", "Dimensional Crack", 175, "Monday 18:00, Friday 18:00"),
    ("Chaiflock", "Dimensional Crack", 180, "Monday 18:00, Friday 18:00"),
    ("Benji", "Dimensional Crack", 185, "Monday 18:00, Friday 18:00"),
];

/// Insert the default roster when the `bosses` table is empty.
///
/// Returns the number of bosses inserted (zero when the table already has
/// rows).
pub async fn seed_default_roster(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bosses")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        tracing::info!(count, "Roster already populated, skipping seed");
        return Ok(0);
    }

    let mut inserted = 0;
    for (name, location, level, respawn_rule) in DEFAULT_ROSTER {
        let result = sqlx::query(
            "INSERT INTO bosses (name, level, location, respawn_rule) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(level)
        .bind(location)
        .bind(respawn_rule)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    tracing::info!(inserted, "Seeded default roster");
    Ok(inserted)
}
