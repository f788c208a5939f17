//! Remote avatar retrieval and the substitution policy for failures.
//!
//! Policy (fixed, documented): an upstream 404 means "user has no avatar"
//! and substitutes the configured placeholder; every other failure
//! (timeout, connection reset, non-2xx) surfaces as `Upstream` so the
//! caller can answer 503 instead of silently serving the wrong picture.

use reqwest::StatusCode;
use tracing::warn;

use crate::config::Config;
use crate::error::ApiError;

pub async fn fetch_avatar(
    http: &reqwest::Client,
    cfg: &Config,
    username: &str,
    size: u32,
) -> Result<Vec<u8>, ApiError> {
    let url = format!("{}/{}.png?size={}", cfg.avatar_url_base, username, size);

    let resp = http
        .get(&url)
        .timeout(cfg.avatar_timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ApiError::Upstream(format!("avatar fetch timed out for '{username}'"))
            } else {
                ApiError::Upstream(format!("avatar fetch failed: {e}"))
            }
        })?;

    match resp.status() {
        StatusCode::OK => {
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| ApiError::Upstream(format!("avatar body read failed: {e}")))?;
            Ok(bytes.to_vec())
        }
        StatusCode::NOT_FOUND => {
            warn!(username, "remote avatar not found, using fallback");
            fallback_bytes(cfg)
        }
        status => Err(ApiError::Upstream(format!(
            "avatar source returned http {status}"
        ))),
    }
}

/// Read the placeholder asset. A missing placeholder is a configuration
/// error, not an upstream one.
pub fn fallback_bytes(cfg: &Config) -> Result<Vec<u8>, ApiError> {
    std::fs::read(&cfg.fallback_avatar).map_err(|e| {
        ApiError::Internal(format!(
            "fallback image is missing or unreadable at {}: {e}",
            cfg.fallback_avatar.display()
        ))
    })
}
