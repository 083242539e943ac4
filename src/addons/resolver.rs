//! Dependency resolution over the catalog
//!
//! Walks an addon tree, fetching each version's declared component
//! references and merging them into the tree in place. Required references
//! always win over user overrides; optional references only fill in what the
//! user left unset. A visited set keyed by version locator breaks reference
//! cycles and keeps every version's references fetched at most once per
//! resolve call.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use futures::future::BoxFuture;

use crate::addons::config::AddonConfig;
use crate::catalog::{ComponentReferenceFetcher, OfferingReferenceItem};

/// Resolve `root` and its descendants in place.
///
/// Fetch failures abort the resolve with an error naming the failing version
/// locator; metadata already written stays in place, and re-running against
/// the same catalog converges to the same tree.
pub async fn resolve_dependencies(
    fetcher: &dyn ComponentReferenceFetcher,
    root: &mut AddonConfig,
) -> Result<()> {
    let mut visited = HashSet::new();
    resolve_node(fetcher, root, &mut visited).await
}

fn resolve_node<'a>(
    fetcher: &'a dyn ComponentReferenceFetcher,
    node: &'a mut AddonConfig,
    visited: &'a mut HashSet<String>,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        // Marking before any recursion is what guarantees termination on
        // cyclic reference graphs.
        if !visited.insert(node.version_locator.clone()) {
            return Ok(());
        }

        tracing::debug!(
            version_locator = %node.version_locator,
            offering = %node.offering_name,
            "resolving component references"
        );

        let references = fetcher
            .component_references(&node.version_locator)
            .await
            .with_context(|| {
                format!(
                    "fetching component references for version locator {}",
                    node.version_locator
                )
            })?;

        let prefix = node.prefix.clone();

        // Required references are processed first so an optional reference
        // with the same name is skipped within this fetch.
        let ordered = references
            .required
            .iter()
            .map(|item| (item, true))
            .chain(references.optional.iter().map(|item| (item, false)));

        let mut processed: HashSet<String> = HashSet::new();
        let mut new_children: Vec<AddonConfig> = Vec::new();

        for (item, required) in ordered {
            if !processed.insert(item.name.clone()) {
                continue;
            }
            // A locator the walk has already covered is never reprocessed,
            // whatever name it appears under.
            if visited.contains(&item.offering_reference.version_locator) {
                continue;
            }
            if !item.offering_reference.is_default_flavor() {
                tracing::debug!(
                    reference = %item.name,
                    flavor = %item.offering_reference.flavor.name,
                    default_flavor = %item.offering_reference.default_flavor,
                    "skipping non-default flavor reference"
                );
                continue;
            }

            let existing = node
                .dependencies
                .iter()
                .position(|dep| dep.offering_name == item.name);

            match existing {
                Some(idx) => {
                    let child = &mut node.dependencies[idx];
                    apply_reference_metadata(child, item, &prefix);

                    if child.inputs.is_none() {
                        child.inputs = Some(HashMap::new());
                    }

                    if required {
                        // Required dependencies must exist in the deployed
                        // graph no matter what the caller asked for, and are
                        // always walked.
                        child.enabled = Some(true);
                        resolve_node(fetcher, child, visited).await?;
                    } else {
                        // User-supplied values win for optional dependencies
                        if child.on_by_default.is_none() {
                            child.on_by_default = Some(item.offering_reference.on_by_default);
                        }
                        if child.enabled.is_none() {
                            child.enabled = Some(item.offering_reference.on_by_default);
                        }
                        // Disabled subtrees are never deployed, so they are
                        // not walked either.
                        if child.enabled == Some(true) {
                            resolve_node(fetcher, child, visited).await?;
                        }
                    }
                }
                None => {
                    // Optional references nobody asked for only join the
                    // tree when the catalog turns them on by default.
                    if !required && !item.offering_reference.on_by_default {
                        continue;
                    }

                    let mut child = new_child_from_reference(item, &prefix);
                    if child.enabled == Some(true) {
                        resolve_node(fetcher, &mut child, visited).await?;
                    }
                    new_children.push(child);
                }
            }
        }

        node.dependencies.extend(new_children);
        Ok(())
    })
}

/// Overwrite a node's catalog identity from a reference. These fields are
/// authoritative server state and are refreshed on every resolve pass.
fn apply_reference_metadata(child: &mut AddonConfig, item: &OfferingReferenceItem, prefix: &str) {
    let reference = &item.offering_reference;
    child.version_locator = reference.version_locator.clone();
    child.offering_id = reference.id.clone();
    child.catalog_id = reference.catalog_id.clone();
    child.resolved_version = reference.version.clone();
    child.prefix = prefix.to_string();
    child.offering_flavor = reference.flavor.name.clone();
    child.offering_label = reference.label.clone();
}

/// New nodes inherit the catalog's default enablement verbatim.
fn new_child_from_reference(item: &OfferingReferenceItem, prefix: &str) -> AddonConfig {
    let mut child = AddonConfig {
        offering_name: item.name.clone(),
        enabled: Some(item.offering_reference.on_by_default),
        on_by_default: Some(item.offering_reference.on_by_default),
        inputs: Some(HashMap::new()),
        ..Default::default()
    };
    apply_reference_metadata(&mut child, item, prefix);
    child
}
