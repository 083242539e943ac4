//! Addon configuration tree
//!
//! The mutable tree handed to the resolver, the planner, and the reconciler.
//! Catalog identity fields are overwritten from catalog metadata on every
//! resolve pass; the override fields keep the distinction between "the user
//! said nothing" and an explicit choice, which drives the merge policy.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One addon in the configuration tree.
///
/// Callers construct the root (and optionally pre-seed dependencies with
/// overrides); the resolver fills in catalog metadata and appends discovered
/// dependencies in place. Nodes are never removed once added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddonConfig {
    // Catalog identity, populated from catalog metadata on resolve
    pub offering_name: String,
    pub offering_label: String,
    pub offering_id: String,
    pub offering_flavor: String,
    pub catalog_id: String,
    pub version_locator: String,
    pub resolved_version: String,

    /// Name prefix for generated deployment configuration names
    pub prefix: String,

    /// Whether this addon deploys. `None` means the user said nothing and the
    /// catalog default decides.
    pub enabled: Option<bool>,
    /// Catalog-declared default enablement, preserved once set
    pub on_by_default: Option<bool>,

    /// Deployment-time input values, keyed by input name. Lazily initialized
    /// by the resolver; user-supplied entries are never overwritten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<HashMap<String, Value>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<AddonConfig>,

    // Deployment bookkeeping, populated after a successful deploy
    pub config_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_config_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_config_name: Option<String>,
    /// Set by the caller to reuse a previously created configuration instead
    /// of creating a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_config_id: Option<String>,
}

impl AddonConfig {
    /// Root addon with a version locator and name prefix; dependencies start
    /// empty and are discovered by the resolver.
    pub fn new(
        prefix: impl Into<String>,
        offering_name: impl Into<String>,
        version_locator: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            offering_name: offering_name.into(),
            version_locator: version_locator.into(),
            ..Default::default()
        }
    }

    /// Deduplication key across the whole tree: the offering identity,
    /// independent of version.
    pub fn offering_identity(&self) -> String {
        format!(
            "{}|{}|{}",
            self.catalog_id, self.offering_id, self.offering_flavor
        )
    }

    /// Load an addon tree from a YAML manifest.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read addon manifest: {}", path.display()))?;
        Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse addon manifest: {}", path.display()))
    }

    /// Parse an addon tree from YAML.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let addon: AddonConfig =
            serde_yaml::from_str(contents).context("Invalid addon manifest YAML")?;
        if addon.version_locator.is_empty() {
            anyhow::bail!("Addon manifest is missing versionLocator");
        }
        Ok(addon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_identity_ignores_version() {
        let mut a = AddonConfig::new("test", "observability", "loc-1");
        a.catalog_id = "cat-1".to_string();
        a.offering_id = "off-1".to_string();
        a.offering_flavor = "standard".to_string();

        let mut b = a.clone();
        b.version_locator = "loc-2".to_string();

        assert_eq!(a.offering_identity(), b.offering_identity());
    }

    #[test]
    fn test_manifest_round_trip() {
        let manifest = r#"
prefix: itest
offeringName: secure-platform
versionLocator: cat-1.loc-root
enabled: true
inputs:
  region: eu-gb
dependencies:
  - offeringName: logging
    enabled: false
"#;
        let addon = AddonConfig::from_yaml(manifest).unwrap();
        assert_eq!(addon.prefix, "itest");
        assert_eq!(addon.version_locator, "cat-1.loc-root");
        assert_eq!(addon.enabled, Some(true));
        assert_eq!(
            addon.inputs.as_ref().unwrap().get("region"),
            Some(&Value::String("eu-gb".to_string()))
        );
        assert_eq!(addon.dependencies.len(), 1);
        assert_eq!(addon.dependencies[0].enabled, Some(false));
        // Unset tri-state fields stay unset
        assert_eq!(addon.dependencies[0].on_by_default, None);
    }

    #[test]
    fn test_manifest_requires_version_locator() {
        let err = AddonConfig::from_yaml("offeringName: no-locator").expect_err("must fail");
        assert!(err.to_string().contains("versionLocator"));
    }
}
