//! Configuration loading and setting resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error. The module logs a warning and
//! continues with defaults.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Logging configuration shared by all Zana binaries
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where a resolved setting came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    CommandLine,
    Environment,
    Toml,
    Default,
}

/// Default TOML path for a module: `~/.config/zana/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("zana").join(format!("{}.toml", module_name)))
}

/// Load a TOML config file into `T`.
///
/// `None` or a path that does not exist yields `T::default()`.
/// A file that exists but cannot be read or parsed is an error.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        debug!("No config file location available, using defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!("Config file not found: {} (using defaults)", path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Resolve a string setting from its four sources.
///
/// Empty or whitespace-only values are skipped at every tier.
pub fn resolve_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
    default: &str,
) -> (String, SettingSource) {
    if let Some(value) = cli_arg.filter(|v| is_set(v)) {
        return (value.to_string(), SettingSource::CommandLine);
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if is_set(&value) {
            return (value, SettingSource::Environment);
        }
    }

    if let Some(value) = toml_value.filter(|v| is_set(v)) {
        return (value.to_string(), SettingSource::Toml);
    }

    (default.to_string(), SettingSource::Default)
}

/// Resolve a required setting that has no compiled default
pub fn require_setting(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_value: Option<&str>,
) -> Result<String> {
    match resolve_setting(cli_arg, env_var_name, toml_value, "") {
        (_, SettingSource::Default) => Err(Error::Config(format!(
            "{} not configured. Set it on the command line, in the environment, or in the TOML config",
            env_var_name
        ))),
        (value, source) => {
            debug!(setting = env_var_name, ?source, "Resolved required setting");
            Ok(value)
        }
    }
}

fn is_set(value: &str) -> bool {
    !value.trim().is_empty()
}
