//! Shared stubs for integration tests
//!
//! In-memory implementations of the catalog and deployment capabilities so
//! the addon pipeline can be exercised without any network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use cloudharness::addons::deploy::{DeployResponse, DeployResponseConfig, DeploymentSubmitter};
use cloudharness::addons::plan::DeploymentEntry;
use cloudharness::catalog::models::{Flavor, OfferingReference, OfferingReferenceItem};
use cloudharness::catalog::{ComponentReferenceFetcher, ReferenceSet};
use cloudharness::client::ApiError;

/// In-memory catalog keyed by version locator. Unknown locators resolve to
/// an empty reference set; every fetch is counted.
#[derive(Default)]
pub struct StubCatalog {
    references: HashMap<String, ReferenceSet>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_references(mut self, version_locator: &str, references: ReferenceSet) -> Self {
        self.references
            .insert(version_locator.to_string(), references);
        self
    }

    /// Number of fetches issued for a locator.
    pub fn fetch_count(&self, version_locator: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(version_locator)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl ComponentReferenceFetcher for StubCatalog {
    async fn component_references(
        &self,
        version_locator: &str,
    ) -> Result<ReferenceSet, ApiError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(version_locator.to_string())
            .or_insert(0) += 1;

        Ok(self
            .references
            .get(version_locator)
            .cloned()
            .unwrap_or_default())
    }
}

/// Records submissions and answers with a canned response.
pub struct StubSubmitter {
    response: Option<DeployResponse>,
    pub submitted: Mutex<Vec<(String, Vec<DeploymentEntry>)>>,
}

impl StubSubmitter {
    pub fn new(response: Option<DeployResponse>) -> Self {
        Self {
            response,
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DeploymentSubmitter for StubSubmitter {
    async fn deploy(
        &self,
        project_id: &str,
        entries: &[DeploymentEntry],
    ) -> Result<Option<DeployResponse>, ApiError> {
        self.submitted
            .lock()
            .unwrap()
            .push((project_id.to_string(), entries.to_vec()));
        Ok(self.response.clone())
    }
}

/// Build a reference item in catalog `cat-1` with the `standard` flavor.
pub fn reference(name: &str, locator: &str, on_by_default: bool) -> OfferingReferenceItem {
    OfferingReferenceItem {
        name: name.to_string(),
        offering_reference: OfferingReference {
            id: format!("off-{name}"),
            label: name.to_string(),
            catalog_id: "cat-1".to_string(),
            version_locator: locator.to_string(),
            version: "1.0.0".to_string(),
            flavor: Flavor {
                name: "standard".to_string(),
                label: "Standard".to_string(),
            },
            default_flavor: String::new(),
            on_by_default,
        },
    }
}

pub fn required(items: &[OfferingReferenceItem]) -> ReferenceSet {
    ReferenceSet {
        required: items.to_vec(),
        optional: Vec::new(),
    }
}

pub fn optional(items: &[OfferingReferenceItem]) -> ReferenceSet {
    ReferenceSet {
        required: Vec::new(),
        optional: items.to_vec(),
    }
}

pub fn response_config(name: &str, config_id: &str) -> DeployResponseConfig {
    DeployResponseConfig {
        name: name.to_string(),
        config_id: config_id.to_string(),
    }
}
