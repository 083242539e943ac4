//! Catalog wire types consumed by the dependency resolver

use serde::{Deserialize, Serialize};

/// Identity and default-enablement metadata for one dependency reference
/// declared by a catalog version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferingReference {
    /// Offering ID within its catalog
    pub id: String,
    pub label: String,
    pub catalog_id: String,
    /// Opaque identifier of the (catalog, offering, flavor, version) tuple
    pub version_locator: String,
    pub version: String,
    pub flavor: Flavor,
    /// Flavor the catalog declares as the default for this reference; empty
    /// when the offering has a single flavor
    pub default_flavor: String,
    /// Whether the catalog enables this dependency when the user says nothing
    pub on_by_default: bool,
}

/// Flavor of an offering version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Flavor {
    pub name: String,
    pub label: String,
}

/// A named dependency reference declared by a version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferingReferenceItem {
    pub name: String,
    pub offering_reference: OfferingReference,
}

/// Required and optional dependency references declared by a single version.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSet {
    pub required: Vec<OfferingReferenceItem>,
    pub optional: Vec<OfferingReferenceItem>,
}

impl OfferingReference {
    /// A reference is eligible for the dependency graph when the catalog
    /// declares no default flavor, or when this reference's flavor is the
    /// declared default.
    pub fn is_default_flavor(&self) -> bool {
        self.default_flavor.is_empty() || self.default_flavor == self.flavor.name
    }
}
