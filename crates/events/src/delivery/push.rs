//! Push delivery via an external gateway, with exponential-backoff retry.
//!
//! [`PushDelivery`] POSTs a JSON-encoded notification to the configured
//! gateway URL. Failed attempts are retried up to three times with
//! exponential backoff (1 s, 2 s, 4 s). Configuration is loaded from
//! environment variables; if `PUSH_GATEWAY_URL` is not set,
//! [`PushConfig::from_env`] returns `None` and push delivery is skipped.

use std::time::Duration;

use paddock_db::models::notification::Notification;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Push gateway returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushConfig
// ---------------------------------------------------------------------------

/// Configuration for the push gateway delivery service.
#[derive(Debug, Clone)]
pub struct PushConfig {
    /// Gateway endpoint receiving notification POSTs.
    pub gateway_url: String,
    /// Optional bearer token sent on every request.
    pub auth_token: Option<String>,
}

impl PushConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `PUSH_GATEWAY_URL` is not set, signalling that
    /// push delivery is not configured and should be skipped.
    ///
    /// | Variable             | Required | Default |
    /// |----------------------|----------|---------|
    /// | `PUSH_GATEWAY_URL`   | yes      | —       |
    /// | `PUSH_GATEWAY_TOKEN` | no       | —       |
    pub fn from_env() -> Option<Self> {
        let gateway_url = std::env::var("PUSH_GATEWAY_URL").ok()?;
        Some(Self {
            gateway_url,
            auth_token: std::env::var("PUSH_GATEWAY_TOKEN").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// PushDelivery
// ---------------------------------------------------------------------------

/// Delivers notifications to recipient devices through the push gateway.
pub struct PushDelivery {
    client: reqwest::Client,
    config: PushConfig,
}

impl PushDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new(config: PushConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// Deliver one notification to the gateway with retry.
    ///
    /// Retries up to 3 times with exponential backoff before giving up.
    /// Returns `Ok(())` on the first successful attempt.
    pub async fn deliver(&self, notification: &Notification) -> Result<(), PushError> {
        let payload = serde_json::json!({
            "user_id": notification.user_id,
            "kind": notification.kind,
            "title": notification.title,
            "message": notification.message,
            "priority": notification.priority,
            "payload": notification.payload,
            "created_at": notification.created_at,
        });

        let mut last_err: Option<PushError> = None;

        for (attempt, delay_secs) in RETRY_DELAYS_SECS.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        notification_id = notification.id,
                        error = %e,
                        "Push delivery attempt failed, retrying"
                    );
                    last_err = Some(e);
                    tokio::time::sleep(Duration::from_secs(*delay_secs)).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(&payload).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(
                    notification_id = notification.id,
                    error = %e,
                    "Push delivery failed after all retries"
                );
                Err(last_err.unwrap_or(e))
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), PushError> {
        let mut request = self.client.post(&self.config.gateway_url).json(payload);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
