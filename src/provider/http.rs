//! Shared HTTP client and status mapping.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::NatfnError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client. It has no request timeout.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_default()
    })
}

/// Build a client, optionally bounded by a per-request timeout.
pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, NatfnError> {
    match timeout {
        None => Ok(shared_client().clone()),
        Some(timeout) => Ok(reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?),
    }
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> NatfnError {
    match status {
        401 | 403 => NatfnError::Authentication(body.to_string()),
        429 => NatfnError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => NatfnError::api(status, extract_message(body).unwrap_or_else(|| body.to_string())),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

// Ollama reports failures as {"error": "<message>"}.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(str::to_string)
}
