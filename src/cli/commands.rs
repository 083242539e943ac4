//! CLI command handlers

use std::path::Path;

use anyhow::{Context, Result};

use cloudharness::addons::{AddonConfig, render_plan};
use cloudharness::config::ConfigLoader;
use cloudharness::services::CloudHarness;

/// Resolve an addon manifest and print the deployment order without
/// deploying anything.
pub async fn handle_plan_command(manifest: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;
    let harness = CloudHarness::connect(config).context("Failed to construct harness")?;

    let mut addon = AddonConfig::from_yaml_file(manifest)?;
    let entries = harness.addons().plan(&mut addon).await?;

    print!("{}", render_plan(&addon, &entries));
    Ok(())
}

/// Resolve an addon manifest and deploy it into a project.
pub async fn handle_deploy_command(
    manifest: &Path,
    project_id: &str,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = ConfigLoader::load(config_path).context("Failed to load configuration")?;
    let harness = CloudHarness::connect(config).context("Failed to construct harness")?;

    let mut addon = AddonConfig::from_yaml_file(manifest)?;
    let response = harness
        .addons()
        .resolve_and_deploy(&mut addon, project_id)
        .await?;

    match response {
        Some(response) => {
            println!("Deployed {} configurations:", response.configs.len());
            for config in &response.configs {
                println!("  {} -> {}", config.name, config.config_id);
            }
        }
        None => {
            println!("Deployment accepted; no configurations were created");
        }
    }

    Ok(())
}
