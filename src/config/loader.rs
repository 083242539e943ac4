//! Configuration loading and merging logic
//!
//! Handles loading configuration from multiple sources and merging them
//! according to precedence rules.

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::HarnessConfig;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Config file (when a path is given)
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> Result<HarnessConfig> {
        let config = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::load_defaults(),
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<HarnessConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: HarnessConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load default configuration
    pub fn load_defaults() -> HarnessConfig {
        HarnessConfig::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: HarnessConfig) -> HarnessConfig {
        if let Ok(catalog_url) = std::env::var("CLOUDHARNESS_CATALOG_URL") {
            config.catalog_url = catalog_url;
        }

        if let Ok(projects_url) = std::env::var("CLOUDHARNESS_PROJECTS_URL") {
            config.projects_url = projects_url;
        }

        if let Ok(iam_url) = std::env::var("CLOUDHARNESS_IAM_URL") {
            config.iam_url = iam_url;
        }

        if let Ok(attempts) = std::env::var("CLOUDHARNESS_MAX_RETRY_ATTEMPTS") {
            if let Ok(val) = attempts.parse::<u32>() {
                config.max_retry_attempts = val;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.api_key_env, "CLOUDHARNESS_API_KEY");
        assert_eq!(config.max_retry_attempts, 3);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "catalogUrl: https://catalog.test.example.com/api/v1\nmaxRetryAttempts: 5"
        )
        .unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(
            config.catalog_url,
            "https://catalog.test.example.com/api/v1"
        );
        assert_eq!(config.max_retry_attempts, 5);
        // Unspecified keys fall back to defaults
        assert_eq!(config.api_key_env, "CLOUDHARNESS_API_KEY");
    }

    #[test]
    fn test_load_file_rejects_invalid_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "catalogUrl: [not, a, string").unwrap();

        assert!(ConfigLoader::load_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: set_var is unsafe in Rust 2024 due to potential data races.
        // This is safe in tests because each test sets its own isolated
        // environment variables and cleans up afterwards.
        unsafe {
            std::env::set_var("CLOUDHARNESS_CATALOG_URL", "https://override.example.com");
            std::env::set_var("CLOUDHARNESS_MAX_RETRY_ATTEMPTS", "7");
        }

        let config = ConfigLoader::apply_env_overrides(HarnessConfig::default());

        assert_eq!(config.catalog_url, "https://override.example.com");
        assert_eq!(config.max_retry_attempts, 7);

        // SAFETY: remove_var is unsafe in Rust 2024 for the same reasons as
        // set_var above.
        unsafe {
            std::env::remove_var("CLOUDHARNESS_CATALOG_URL");
            std::env::remove_var("CLOUDHARNESS_MAX_RETRY_ATTEMPTS");
        }
    }
}
