//! Discord webhook delivery with exponential-backoff retry.
//!
//! [`DiscordNotifier`] posts a plain-text message to a Discord webhook URL.
//! Failed attempts are retried up to three times with exponential backoff
//! (1 s, 2 s, 4 s).

use std::sync::Arc;
use std::time::Duration;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for Discord delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook returned a non-2xx status code.
    #[error("Discord webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// DiscordNotifier
// ---------------------------------------------------------------------------

/// Delivers respawn alerts to a Discord channel via an incoming webhook.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
    role_id: Option<String>,
}

impl DiscordNotifier {
    /// Create a notifier for a webhook URL, optionally mentioning a role
    /// in every message.
    pub fn new(webhook_url: impl Into<String>, role_id: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            webhook_url: webhook_url.into(),
            role_id,
        }
    }

    /// Send a message, retrying with backoff before giving up.
    ///
    /// Returns `Ok(())` on the first successful attempt.
    pub async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        let content = format_content(self.role_id.as_deref(), message);
        let payload = serde_json::json!({ "content": content });

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "Discord delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff; its error is the one that
        // surfaces to the caller.
        match self.try_send(&payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "Discord delivery failed after all retries");
                Err(e)
            }
        }
    }

    /// Fire-and-forget delivery from a non-async-friendly call site.
    ///
    /// Spawns the retrying send on the runtime; delivery failures are
    /// logged by [`send`](DiscordNotifier::send) and otherwise dropped so
    /// the respawn watcher never blocks on Discord.
    pub fn notify(self: &Arc<Self>, message: String) {
        let notifier = Arc::clone(self);
        tokio::spawn(async move {
            let _ = notifier.send(&message).await;
        });
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DeliveryError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Build the message content, prefixing a role mention when configured.
fn format_content(role_id: Option<&str>, message: &str) -> String {
    match role_id {
        Some(role) => format!("<@&{role}> {message}"),
        None => message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // Paused time fast-forwards the backoff sleeps; the port is the discard
    // service, so every attempt fails the same local-connection way.
    #[tokio::test(start_paused = true)]
    async fn send_surfaces_the_final_attempt_error() {
        let notifier = DiscordNotifier::new("http://127.0.0.1:9/webhook", None);
        let err = notifier
            .send("🔔 **Venatus** has respawned!")
            .await
            .unwrap_err();
        assert_matches!(err, DeliveryError::Request(_));
    }

    #[test]
    fn new_does_not_panic() {
        let _notifier = DiscordNotifier::new("https://discord.com/api/webhooks/x/y", None);
    }

    #[test]
    fn content_includes_role_mention_when_configured() {
        let content = format_content(Some("123456789"), "🔔 **Venatus** has respawned!");
        assert_eq!(content, "<@&123456789> 🔔 **Venatus** has respawned!");
    }

    #[test]
    fn content_is_bare_message_without_role() {
        let content = format_content(None, "⏰ **Larba** respawns in 10 minutes!");
        assert_eq!(content, "⏰ **Larba** respawns in 10 minutes!");
    }

    #[test]
    fn delivery_error_display_http_status() {
        let err = DeliveryError::HttpStatus(429);
        assert_eq!(err.to_string(), "Discord webhook returned HTTP 429");
    }
}
