//! Harness facade
//!
//! `CloudHarness` wires the token manager and the service clients into a
//! single object integration tests construct once per run. This is the
//! primary entry point for using cloudharness as a library.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::addons::deploy::ProjectDeployer;
use crate::auth::{IamTokenManager, TokenProvider};
use crate::catalog::CatalogClient;
use crate::client::{self, RetryConfig};
use crate::config::schema::HarnessConfig;
use crate::services::AddonService;

/// A configured harness holding the shared authenticator and the addon
/// pipeline.
///
/// # Example
///
/// ```rust,no_run
/// use cloudharness::CloudHarness;
/// use cloudharness::addons::AddonConfig;
/// use cloudharness::config::HarnessConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let harness = CloudHarness::connect(HarnessConfig::default())?;
///
/// let mut addon = AddonConfig::new("itest", "secure-platform", "cat-1.loc-root");
/// let response = harness.addons().resolve_and_deploy(&mut addon, "project-id").await?;
/// # Ok(())
/// # }
/// ```
pub struct CloudHarness {
    config: HarnessConfig,
    token_provider: Arc<dyn TokenProvider>,
    addons: AddonService,
}

impl CloudHarness {
    /// Build a harness from configuration, constructing the shared HTTP
    /// client, token manager, catalog client, and project deployer.
    pub fn connect(config: HarnessConfig) -> Result<Self> {
        let http = client::build_http_client(Duration::from_secs(config.request_timeout_secs))?;

        let catalog_url = client::normalize_base_url(&config.catalog_url)?;
        let projects_url = client::normalize_base_url(&config.projects_url)?;

        let api_key = config
            .resolve_api_key()
            .context("Failed to resolve API key")?;
        let token_provider: Arc<dyn TokenProvider> = Arc::new(IamTokenManager::new(
            http.clone(),
            config.iam_url.clone(),
            api_key,
        ));

        let retry = RetryConfig::with_max_attempts(config.max_retry_attempts);

        let fetcher = Arc::new(CatalogClient::new(
            http.clone(),
            catalog_url,
            token_provider.clone(),
            retry.clone(),
        ));
        let submitter = Arc::new(ProjectDeployer::new(
            http,
            projects_url,
            token_provider.clone(),
            retry,
        ));

        Ok(Self {
            config,
            token_provider,
            addons: AddonService::new(fetcher, submitter),
        })
    }

    /// Returns the addon resolution and deployment service.
    pub fn addons(&self) -> &AddonService {
        &self.addons
    }

    /// Returns the shared token provider, for callers wiring additional
    /// service clients against the same account.
    pub fn token_provider(&self) -> Arc<dyn TokenProvider> {
        self.token_provider.clone()
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }
}
