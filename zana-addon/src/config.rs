//! Configuration resolution for zana-addon
//!
//! Same priority as every Zana binary: command line → environment → TOML
//! (`~/.config/zana/zana-addon.toml`) → compiled defaults.

use serde::Deserialize;
use tracing::debug;
use zana_common::config::{resolve_setting, LoggingConfig};

use crate::provider::DEFAULT_API_URL;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Aggregation API endpoint
    pub api_url: Option<String>,
    /// Prefix for packaged assets; empty keeps paths relative
    pub asset_base_url: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub asset_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonConfig {
    pub api_url: String,
    pub asset_base_url: String,
}

impl AddonConfig {
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Self {
        let (api_url, api_url_source) = resolve_setting(
            cli.api_url.as_deref(),
            "ZANA_API_URL",
            toml.api_url.as_deref(),
            DEFAULT_API_URL,
        );
        let (asset_base_url, _) = resolve_setting(
            cli.asset_base_url.as_deref(),
            "ZANA_ASSET_BASE_URL",
            toml.asset_base_url.as_deref(),
            "",
        );

        debug!(
            api_url = %api_url,
            source = ?api_url_source,
            asset_base_url = %asset_base_url,
            "Add-on configuration resolved"
        );

        Self {
            api_url,
            asset_base_url,
        }
    }
}
