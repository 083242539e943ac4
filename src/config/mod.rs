//! Configuration system for cloudharness
//!
//! Configuration is layered: built-in defaults, then an optional YAML config
//! file, then `CLOUDHARNESS_*` environment variable overrides.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::HarnessConfig;
