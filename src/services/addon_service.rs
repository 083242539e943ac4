//! Addon orchestration service
//!
//! Ties the resolver, planner, submitter, and reconciler together behind a
//! single call. The external collaborators are injected as capability traits
//! so the whole pipeline runs against fakes in tests.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::addons::config::AddonConfig;
use crate::addons::deploy::{DeployResponse, DeploymentSubmitter};
use crate::addons::plan::{DeploymentEntry, build_deployment_list};
use crate::addons::reconcile::reconcile_config_ids;
use crate::addons::resolver::resolve_dependencies;
use crate::catalog::ComponentReferenceFetcher;

/// Service for resolving and deploying addon trees.
pub struct AddonService {
    fetcher: Arc<dyn ComponentReferenceFetcher>,
    submitter: Arc<dyn DeploymentSubmitter>,
}

impl AddonService {
    pub fn new(
        fetcher: Arc<dyn ComponentReferenceFetcher>,
        submitter: Arc<dyn DeploymentSubmitter>,
    ) -> Self {
        Self { fetcher, submitter }
    }

    /// Resolve the addon tree against the catalog without deploying.
    pub async fn resolve(&self, addon: &mut AddonConfig) -> Result<()> {
        resolve_dependencies(self.fetcher.as_ref(), addon)
            .await
            .context("Failed to resolve addon dependencies")
    }

    /// Resolve the tree and flatten it into deployment order without
    /// submitting anything.
    pub async fn plan(&self, addon: &mut AddonConfig) -> Result<Vec<DeploymentEntry>> {
        self.resolve(addon).await?;
        Ok(build_deployment_list(addon))
    }

    /// Resolve, flatten, deploy into `project_id`, and reconcile the
    /// returned identifiers back into `addon`.
    ///
    /// Returns `Ok(None)` when the deployment endpoint created nothing; the
    /// tree is left exactly as the planner produced it in that case.
    pub async fn resolve_and_deploy(
        &self,
        addon: &mut AddonConfig,
        project_id: &str,
    ) -> Result<Option<DeployResponse>> {
        self.resolve(addon).await?;

        let entries = build_deployment_list(addon);
        tracing::debug!(
            project_id,
            configurations = entries.len(),
            "deployment plan ready"
        );

        let response = self
            .submitter
            .deploy(project_id, &entries)
            .await
            .with_context(|| {
                format!(
                    "deploying {} configurations to project {}",
                    entries.len(),
                    project_id
                )
            })?;

        let Some(response) = response else {
            return Ok(None);
        };

        reconcile_config_ids(addon, &response);
        Ok(Some(response))
    }
}
