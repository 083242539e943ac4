//! Catalog service access
//!
//! Provides the component-reference lookups the dependency resolver walks.
//! The resolver only sees the [`ComponentReferenceFetcher`] trait; the
//! production implementation is an HTTP client against the catalog service.

pub mod models;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::TokenProvider;
use crate::client::{ApiError, RetryConfig, retry_with_backoff};

pub use models::{Flavor, OfferingReference, OfferingReferenceItem, ReferenceSet};

/// Capability consumed by the dependency resolver.
///
/// Implementations must retry transient failures (rate limiting, server
/// errors) before surfacing an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComponentReferenceFetcher: Send + Sync {
    /// Fetch the required/optional dependency references declared by the
    /// version identified by `version_locator`.
    async fn component_references(
        &self,
        version_locator: &str,
    ) -> Result<ReferenceSet, ApiError>;
}

/// HTTP client for the catalog service.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    retry: RetryConfig,
}

impl CatalogClient {
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

    fn references_url(&self, version_locator: &str) -> String {
        format!(
            "{}/versions/{}/component_references",
            self.base_url, version_locator
        )
    }

    async fn fetch_once(&self, version_locator: &str) -> Result<ReferenceSet, ApiError> {
        let token = self.token_provider.access_token().await?;

        let response = self
            .client
            .get(self.references_url(version_locator))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                operation: "component references",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                operation: "component references",
                status,
                body,
            });
        }

        response
            .json::<ReferenceSet>()
            .await
            .map_err(|source| ApiError::Decode {
                operation: "component references",
                source,
            })
    }
}

#[async_trait]
impl ComponentReferenceFetcher for CatalogClient {
    async fn component_references(
        &self,
        version_locator: &str,
    ) -> Result<ReferenceSet, ApiError> {
        tracing::debug!(version_locator, "fetching component references");

        retry_with_backoff(
            &self.retry,
            "component references",
            ApiError::is_retryable,
            || self.fetch_once(version_locator),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use httpmock::{Method::GET, MockServer};
    use std::time::Duration;

    fn fast_retry(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
        }
    }

    fn test_client(server: &MockServer, max_attempts: u32) -> CatalogClient {
        CatalogClient::new(
            reqwest::Client::new(),
            server.url(""),
            Arc::new(StaticTokenProvider::new("test-token")),
            fast_retry(max_attempts),
        )
    }

    #[tokio::test]
    async fn fetches_references_with_bearer_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/versions/loc-1/component_references")
                .header("authorization", "Bearer test-token");
            then.status(200).json_body(serde_json::json!({
                "required": [
                    {
                        "name": "base-layer",
                        "offering_reference": {
                            "id": "off-base",
                            "catalog_id": "cat-1",
                            "version_locator": "loc-base",
                            "version": "1.2.3",
                            "flavor": {"name": "standard"},
                            "on_by_default": true
                        }
                    }
                ],
                "optional": []
            }));
        });

        let references = test_client(&server, 3)
            .component_references("loc-1")
            .await
            .expect("fetch succeeds");

        assert_eq!(references.required.len(), 1);
        assert_eq!(references.required[0].name, "base-layer");
        assert_eq!(
            references.required[0].offering_reference.version_locator,
            "loc-base"
        );
    }

    #[tokio::test]
    async fn retries_rate_limited_responses() {
        let server = MockServer::start();
        let rate_limited = server.mock(|when, then| {
            when.method(GET).path("/versions/loc-1/component_references");
            then.status(429).body("slow down");
        });

        let err = test_client(&server, 3)
            .component_references("loc-1")
            .await
            .expect_err("retries exhaust");

        rate_limited.assert_hits(3);
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn non_retryable_status_fails_fast_with_body() {
        let server = MockServer::start();
        let not_found = server.mock(|when, then| {
            when.method(GET).path("/versions/loc-x/component_references");
            then.status(404).body("no such version");
        });

        let err = test_client(&server, 3)
            .component_references("loc-x")
            .await
            .expect_err("fails fast");

        not_found.assert_hits(1);
        assert!(err.to_string().contains("no such version"));
    }
}
