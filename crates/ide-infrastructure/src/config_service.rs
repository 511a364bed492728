//! Configuration service implementation.
//!
//! Loads [`IdeConfig`] from `~/.config/saas-ide/config.toml` and applies
//! environment overrides on top.

use crate::paths;
use ide_core::config::IdeConfig;
use ide_core::{IdeError, Result};
use std::fs;
use std::path::Path;

/// Overrides `api_base_url`.
pub const API_BASE_URL_ENV: &str = "IDE_API_BASE_URL";
/// Overrides `execution_url`.
pub const EXECUTION_URL_ENV: &str = "IDE_EXECUTION_URL";

pub struct ConfigService;

impl ConfigService {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<IdeConfig> {
        let path = paths::config_file()?;
        Self::load_from(&path)
    }

    /// Loads the configuration from `path`, then applies environment overrides.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load_from(path: &Path) -> Result<IdeConfig> {
        let mut config = Self::read_file(path)?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<IdeConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", path);
            return Ok(IdeConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            IdeError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(IdeConfig::default());
        }

        let config: IdeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(config: &mut IdeConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("{} overrides api_base_url", API_BASE_URL_ENV);
            config.api_base_url = url;
        }
        if let Some(url) = lookup(EXECUTION_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("{} overrides execution_url", EXECUTION_URL_ENV);
            config.execution_url = url;
        }
    }
}
