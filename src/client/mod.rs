//! Shared HTTP plumbing for the service clients
//!
//! The catalog client, token manager, and project deployer all speak to their
//! endpoints through the same error type and retry policy defined here.

pub mod retry;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;

pub use retry::{RetryConfig, retry_with_backoff};

/// Error type shared by the HTTP-backed service clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response from a service endpoint
    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    /// Transport-level failure (connect, TLS, timeout)
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded
    #[error("decoding {operation} response failed: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Rate limiting and server errors are worth retrying; everything else
    /// surfaces immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            ApiError::Transport { .. } | ApiError::Decode { .. } => false,
        }
    }
}

/// Build the shared HTTP client used by all service clients.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Normalize a service base URL: validated, trailing slash stripped.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let parsed =
        url::Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
