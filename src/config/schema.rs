//! Configuration schema definitions
//!
//! Defines the structure of harness configuration files using serde for
//! serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration for a harness run: service endpoints, credentials
/// indirection, and retry limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Catalog service base URL
    pub catalog_url: String,

    /// Projects service base URL (hosts the deployment endpoint)
    pub projects_url: String,

    /// Token-exchange endpoint
    pub iam_url: String,

    /// Environment variable holding the API key. The key itself never lives
    /// in a config file.
    pub api_key_env: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum attempts for retryable requests, including the first one
    pub max_retry_attempts: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://catalog.cloud.example.com/api/v1".to_string(),
            projects_url: "https://projects.cloud.example.com/api/v1".to_string(),
            iam_url: "https://iam.cloud.example.com/identity/token".to_string(),
            api_key_env: "CLOUDHARNESS_API_KEY".to_string(),
            request_timeout_secs: 30,
            max_retry_attempts: 3,
        }
    }
}

impl HarnessConfig {
    /// Read the API key from the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env).with_context(|| {
            format!(
                "Environment variable {} not set (required for authentication)",
                self.api_key_env
            )
        })
    }
}
