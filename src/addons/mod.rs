//! Addon dependency resolution and deployment
//!
//! The addon pipeline: a caller-built [`AddonConfig`] tree is resolved
//! against the catalog, flattened into a deployment plan, submitted to a
//! project, and the response identifiers are reconciled back into the tree.

pub mod config;
pub mod deploy;
pub mod plan;
pub mod reconcile;
pub mod resolver;

pub use config::AddonConfig;
pub use deploy::{DeployResponse, DeployResponseConfig, DeploymentSubmitter, ProjectDeployer};
pub use plan::{DeploymentEntry, build_deployment_list, render_plan, teardown_order};
pub use reconcile::{CONTAINER_SUFFIX, reconcile_config_ids};
pub use resolver::resolve_dependencies;
