//! Shared HTTP plumbing for the hosted providers.

use std::time::Duration;

use advisor_core::{AgentError, Result};
use anyhow::Context;
use reqwest::StatusCode;

pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build reqwest client")?;
    Ok(client)
}

/// Map a non-success HTTP status onto the provider error taxonomy.
pub fn status_error(provider: &str, status: StatusCode, body: &str) -> AgentError {
    let detail = format!("{provider} returned {status}: {}", truncate(body, 300));
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(detail),
        StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(detail),
        s if s.is_server_error() => AgentError::ProviderUnavailable(detail),
        _ => AgentError::Provider(detail),
    }
}

/// Map a transport failure (connect, timeout, body read).
pub fn transport_error(provider: &str, err: &reqwest::Error) -> AgentError {
    if err.is_timeout() || err.is_connect() {
        AgentError::ProviderUnavailable(format!("{provider}: {err}"))
    } else {
        AgentError::Provider(format!("{provider}: {err}"))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error("gemini", StatusCode::UNAUTHORIZED, ""),
            AgentError::Auth(_)
        ));
        assert!(matches!(
            status_error("openai", StatusCode::TOO_MANY_REQUESTS, ""),
            AgentError::RateLimited(_)
        ));
        assert!(matches!(
            status_error("openai", StatusCode::BAD_GATEWAY, ""),
            AgentError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            status_error("openai", StatusCode::BAD_REQUEST, ""),
            AgentError::Provider(_)
        ));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("₹₹₹₹", 2), "₹₹");
        assert_eq!(truncate("short", 300), "short");
    }
}
