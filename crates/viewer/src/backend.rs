//! Server access behind the [`BossBackend`] trait.
//!
//! The trait exists so the sync client can be tested against an
//! in-memory backend; production uses [`HttpBackend`] against the
//! bosswatch REST API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// HTTP request timeout for a single backend call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A boss as served by the backend.
///
/// Only the fields the viewer renders; everything else in the server's
/// response is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct BossRecord {
    pub name: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub respawn_rule: String,
    #[serde(default)]
    pub last_killed: Option<DateTime<Utc>>,
}

/// Error type for backend failures.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Server returned HTTP {0}")]
    HttpStatus(u16),
}

/// The operations the sync client needs from a server.
#[async_trait]
pub trait BossBackend: Send + Sync {
    /// Fetch the full roster.
    async fn list_all(&self) -> Result<Vec<BossRecord>, BackendError>;

    /// Record a kill (`Some`) or clear one (`None`).
    async fn set_last_killed(
        &self,
        name: &str,
        killed_at: Option<DateTime<Utc>>,
    ) -> Result<(), BackendError>;
}

/// REST client for a bosswatch server.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    password: String,
}

impl HttpBackend {
    /// Create a backend for `base_url` (no trailing slash), authenticating
    /// writes with the shared dashboard password.
    pub fn new(base_url: impl Into<String>, password: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl BossBackend for HttpBackend {
    async fn list_all(&self) -> Result<Vec<BossRecord>, BackendError> {
        let url = format!("{}/api/v1/bosses", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn set_last_killed(
        &self,
        name: &str,
        killed_at: Option<DateTime<Utc>>,
    ) -> Result<(), BackendError> {
        let (action, body) = match killed_at {
            Some(ts) => ("kill", serde_json::json!({ "killed_at": ts })),
            None => ("unkill", serde_json::json!({})),
        };
        let url = format!("{}/api/v1/bosses/{}/{}", self.base_url, name, action);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.password)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
