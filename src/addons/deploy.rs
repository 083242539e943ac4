//! Deployment submission
//!
//! Serializes a deployment plan and posts it to the per-project deployment
//! endpoint. Rate limiting and server errors are retried with a fresh bearer
//! token per attempt; any other failure status surfaces immediately with the
//! response body.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::addons::plan::DeploymentEntry;
use crate::auth::TokenProvider;
use crate::client::{ApiError, RetryConfig, retry_with_backoff};

/// Per-entry configuration identifiers returned by the deployment endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResponseConfig {
    pub name: String,
    pub config_id: String,
}

/// Response body of the deployment endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployResponse {
    #[serde(default)]
    pub configs: Vec<DeployResponseConfig>,
}

/// Capability for submitting a deployment plan to a project.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeploymentSubmitter: Send + Sync {
    /// Deploy `entries` into `project_id`.
    ///
    /// `Ok(None)` means the endpoint accepted the request but created no
    /// configurations, so there is nothing to reconcile.
    async fn deploy(
        &self,
        project_id: &str,
        entries: &[DeploymentEntry],
    ) -> Result<Option<DeployResponse>, ApiError>;
}

/// HTTP client for the per-project deployment endpoint.
pub struct ProjectDeployer {
    client: reqwest::Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    retry: RetryConfig,
}

impl ProjectDeployer {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token_provider: Arc<dyn TokenProvider>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_provider,
            retry,
        }
    }

    fn deploy_url(&self, project_id: &str) -> String {
        format!("{}/projects/{}/deploy", self.base_url, project_id)
    }

    async fn submit_once(
        &self,
        project_id: &str,
        entries: &[DeploymentEntry],
    ) -> Result<DeployResponse, ApiError> {
        // Tokens may expire between attempts, so each attempt asks the
        // provider again instead of holding one token across retries.
        let token = self.token_provider.access_token().await?;

        let response = self
            .client
            .post(self.deploy_url(project_id))
            .bearer_auth(token)
            .json(entries)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                operation: "deploy",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                operation: "deploy",
                status,
                body,
            });
        }

        response
            .json::<DeployResponse>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "deploy",
                source,
            })
    }
}

#[async_trait]
impl DeploymentSubmitter for ProjectDeployer {
    async fn deploy(
        &self,
        project_id: &str,
        entries: &[DeploymentEntry],
    ) -> Result<Option<DeployResponse>, ApiError> {
        tracing::debug!(project_id, entries = entries.len(), "submitting deployment");

        let response = retry_with_backoff(&self.retry, "deploy", ApiError::is_retryable, || {
            self.submit_once(project_id, entries)
        })
        .await?;

        if response.configs.is_empty() {
            tracing::debug!(project_id, "deployment returned no configurations");
            return Ok(None);
        }

        Ok(Some(response))
    }
}
