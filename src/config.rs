//! Tool configuration for vibezip.
//! Settings come from an optional JSON or YAML file and are overridden by
//! command-line flags.

use crate::cli::Args;
use crate::constants::{CONFIG_FILES, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::materializer::MaterializeOptions;
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Contents of a `.vibezip.json` / `.vibezip.yml` file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    pub timeout_secs: Option<u64>,
    pub self_update_url: Option<String>,
    pub auto_confirm: Option<bool>,
    pub backup: Option<bool>,
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither
pub fn parse_config(content: &str) -> Result<ToolConfig> {
    if content.trim().is_empty() {
        return Ok(ToolConfig::default());
    }
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {}", e))),
    }
}

/// Loads the tool configuration.
///
/// # Arguments
/// * `explicit` - Path given with `--config`; it must exist
/// * `dir` - Directory searched for [`CONFIG_FILES`] when no path is given
///
/// # Returns
/// * `Result<ToolConfig>` - The parsed configuration, or defaults when no file is found
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<ToolConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(Error::ConfigError(format!(
                "configuration file '{}' does not exist",
                path.display()
            )));
        }
        return parse_config(&std::fs::read_to_string(path)?);
    }

    for file in CONFIG_FILES {
        let config_path = dir.join(file);
        if config_path.is_file() {
            debug!("Loading configuration from {}", config_path.display());
            return parse_config(&std::fs::read_to_string(&config_path)?);
        }
    }

    Ok(ToolConfig::default())
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub timeout: Duration,
    pub self_update_url: Option<String>,
    pub auto_confirm: bool,
    pub backup: bool,
}

impl Settings {
    /// Combines flags and configuration. A flag that is set always wins.
    pub fn resolve(args: &Args, config: ToolConfig) -> Self {
        Self {
            timeout: Duration::from_secs(
                args.timeout.or(config.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            self_update_url: config.self_update_url,
            auto_confirm: args.yes || config.auto_confirm.unwrap_or(false),
            backup: args.backup || config.backup.unwrap_or(false),
        }
    }

    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions { auto_confirm: self.auto_confirm, backup: self.backup }
    }
}
