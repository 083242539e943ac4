//! Deployment plan construction
//!
//! Flattens a resolved addon tree into the ordered entry list submitted to
//! the deployment endpoint. The root always deploys first; enabled
//! dependencies follow in pre-order, deduplicated by offering identity so
//! the occurrence closest to the root wins.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::addons::config::AddonConfig;

/// One entry in the deployment request wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEntry {
    pub version_locator: String,
    /// Deployment configuration name
    pub name: String,
    /// Present when the caller reuses a previously created configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
}

const SUFFIX_LEN: usize = 6;
const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random lowercase token appended to generated dependency config names so
/// repeated runs against the same project do not collide.
fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

/// Flatten `root` into deployment order.
///
/// Missing configuration names are generated and written back into the tree
/// (`{prefix}-{offeringName}` for the root, `{offeringName}-{suffix}` for
/// dependencies) so the reconciler can match the response by name later.
pub fn build_deployment_list(root: &mut AddonConfig) -> Vec<DeploymentEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    // The root deploys unconditionally and always first.
    if root.config_name.is_empty() {
        root.config_name = format!("{}-{}", root.prefix, root.offering_name);
    }
    seen.insert(root.offering_identity());
    entries.push(entry_for(root));

    collect_dependencies(&mut root.dependencies, &mut seen, &mut entries);
    entries
}

fn collect_dependencies(
    dependencies: &mut [AddonConfig],
    seen: &mut HashSet<String>,
    entries: &mut Vec<DeploymentEntry>,
) {
    for dep in dependencies.iter_mut() {
        if dep.enabled != Some(true) {
            continue;
        }
        // The topmost occurrence of an offering identity wins; later
        // occurrences (and their subtrees) are dropped even when their
        // version differs.
        if !seen.insert(dep.offering_identity()) {
            continue;
        }
        if dep.config_name.is_empty() {
            dep.config_name = format!("{}-{}", dep.offering_name, random_suffix());
        }
        entries.push(entry_for(dep));
        collect_dependencies(&mut dep.dependencies, seen, entries);
    }
}

fn entry_for(node: &AddonConfig) -> DeploymentEntry {
    DeploymentEntry {
        version_locator: node.version_locator.clone(),
        name: node.config_name.clone(),
        config_id: node.existing_config_id.clone(),
    }
}

/// Teardown order for a deployed plan: dependencies first, root last.
pub fn teardown_order(entries: &[DeploymentEntry]) -> Vec<DeploymentEntry> {
    entries.iter().rev().cloned().collect()
}

/// Render a resolved tree and its deployment order for human consumption.
pub fn render_plan(root: &AddonConfig, entries: &[DeploymentEntry]) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out.push('\n');
    out.push_str("Deployment order:\n");
    for (index, entry) in entries.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} ({})\n",
            index + 1,
            entry.name,
            entry.version_locator
        ));
    }
    out
}

fn render_node(node: &AddonConfig, depth: usize, out: &mut String) {
    let state = match node.enabled {
        Some(true) => "enabled",
        Some(false) => "disabled",
        None => "default",
    };
    let version = if node.resolved_version.is_empty() {
        "unresolved"
    } else {
        &node.resolved_version
    };
    out.push_str(&format!(
        "{}- {} [{}] {} ({})\n",
        "  ".repeat(depth),
        node.offering_name,
        state,
        version,
        node.version_locator
    ));
    for dep in &node.dependencies {
        render_node(dep, depth + 1, out);
    }
}
