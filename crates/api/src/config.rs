/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Shared password protecting all mutating endpoints.
    pub dashboard_password: String,
    /// Discord webhook URL for respawn alerts. Alerts are disabled when unset.
    pub discord_webhook_url: Option<String>,
    /// Discord role to mention in alerts, e.g. a raid-ping role id.
    pub discord_role_id: Option<String>,
    /// How often the respawn watcher scans the roster (default: `30`).
    pub respawn_check_interval_secs: u64,
    /// How often viewers on the snapshot stream are pinged (default: `30`).
    pub heartbeat_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `DASHBOARD_PASSWORD`          | `change-me`             |
    /// | `DISCORD_WEBHOOK_URL`         | (unset)                 |
    /// | `DISCORD_ROLE_ID`             | (unset)                 |
    /// | `RESPAWN_CHECK_INTERVAL_SECS` | `30`                    |
    /// | `HEARTBEAT_INTERVAL_SECS`     | `30`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let dashboard_password =
            std::env::var("DASHBOARD_PASSWORD").unwrap_or_else(|_| "change-me".into());

        let discord_webhook_url = std::env::var("DISCORD_WEBHOOK_URL").ok();
        let discord_role_id = std::env::var("DISCORD_ROLE_ID").ok();

        let respawn_check_interval_secs: u64 = std::env::var("RESPAWN_CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("RESPAWN_CHECK_INTERVAL_SECS must be a valid u64");

        let heartbeat_interval_secs: u64 = std::env::var("HEARTBEAT_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("HEARTBEAT_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            dashboard_password,
            discord_webhook_url,
            discord_role_id,
            respawn_check_interval_secs,
            heartbeat_interval_secs,
        }
    }
}
