//! Response reconciliation
//!
//! Maps the deployment response's configuration identifiers back onto the
//! addon tree by configuration name. Container configurations are paired
//! with their base configuration purely by the `" Container"` name suffix.

use std::collections::HashMap;

use crate::addons::config::AddonConfig;
use crate::addons::deploy::DeployResponse;

/// Name suffix marking a container configuration in the deploy response.
pub const CONTAINER_SUFFIX: &str = " Container";

/// Write the response's configuration identifiers into the tree in place.
///
/// Nodes whose configuration name does not appear in the response are left
/// unchanged; disabled dependencies were never submitted, so their absence
/// is expected.
pub fn reconcile_config_ids(root: &mut AddonConfig, response: &DeployResponse) {
    let mut configs: HashMap<&str, &str> = HashMap::new();
    let mut containers: HashMap<&str, &str> = HashMap::new();

    for config in &response.configs {
        match config.name.strip_suffix(CONTAINER_SUFFIX) {
            Some(base) => {
                containers.insert(base, config.config_id.as_str());
            }
            None => {
                configs.insert(config.name.as_str(), config.config_id.as_str());
            }
        }
    }

    apply(root, &configs, &containers);
}

fn apply(
    node: &mut AddonConfig,
    configs: &HashMap<&str, &str>,
    containers: &HashMap<&str, &str>,
) {
    if let Some(id) = configs.get(node.config_name.as_str()) {
        node.config_id = Some((*id).to_string());
    }
    if let Some(id) = containers.get(node.config_name.as_str()) {
        node.container_config_id = Some((*id).to_string());
        node.container_config_name = Some(format!("{}{}", node.config_name, CONTAINER_SUFFIX));
    }

    for dep in &mut node.dependencies {
        apply(dep, configs, containers);
    }
}
