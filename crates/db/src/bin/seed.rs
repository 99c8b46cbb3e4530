//! Roster seeding tool.
//!
//! Connects to `DATABASE_URL`, applies pending migrations, and inserts the
//! default roster when the `bosses` table is empty. Safe to run on every
//! deploy.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bosswatch_db=info,seed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = bosswatch_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    bosswatch_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let inserted = bosswatch_db::seed::seed_default_roster(&pool)
        .await
        .expect("Failed to seed roster");

    tracing::info!(inserted, "Roster seeding complete");
}
