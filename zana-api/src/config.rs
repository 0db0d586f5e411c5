//! Configuration resolution for zana-api
//!
//! **Priority:** command line → environment → TOML (`~/.config/zana/zana-api.toml`)
//! → compiled defaults. The Google Books API key has no default.

use serde::Deserialize;
use tracing::info;
use zana_common::config::{require_setting, resolve_setting, LoggingConfig};
use zana_common::Result;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_GOOGLEBOOKS_API_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_OPENLIBRARY_API_URL: &str = "https://openlibrary.org";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub googlebooks_api_key: Option<String>,
    pub googlebooks_api_url: Option<String>,
    pub openlibrary_api_url: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub googlebooks_api_key: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub googlebooks_api_key: String,
    pub googlebooks_api_url: String,
    pub openlibrary_api_url: String,
}

impl ServiceConfig {
    /// Resolve every setting from its sources
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let (host, _) = resolve_setting(
            cli.host.as_deref(),
            "ZANA_HOST",
            toml.host.as_deref(),
            DEFAULT_HOST,
        );

        let cli_port = cli.port.map(|p| p.to_string());
        let toml_port = toml.port.map(|p| p.to_string());
        let (port, source) = resolve_setting(
            cli_port.as_deref(),
            "ZANA_PORT",
            toml_port.as_deref(),
            &DEFAULT_PORT.to_string(),
        );
        let port = port.parse::<u16>().map_err(|e| {
            zana_common::Error::Config(format!("Invalid port '{}' ({:?}): {}", port, source, e))
        })?;

        let googlebooks_api_key = require_setting(
            cli.googlebooks_api_key.as_deref(),
            "GOOGLEBOOKS_API_KEY",
            toml.googlebooks_api_key.as_deref(),
        )?;

        let (googlebooks_api_url, _) = resolve_setting(
            None,
            "GOOGLEBOOKS_API_URL",
            toml.googlebooks_api_url.as_deref(),
            DEFAULT_GOOGLEBOOKS_API_URL,
        );
        let (openlibrary_api_url, _) = resolve_setting(
            None,
            "OPENLIBRARY_API_URL",
            toml.openlibrary_api_url.as_deref(),
            DEFAULT_OPENLIBRARY_API_URL,
        );

        info!(
            host = %host,
            port = port,
            googlebooks_api_url = %googlebooks_api_url,
            openlibrary_api_url = %openlibrary_api_url,
            "Service configuration resolved"
        );

        Ok(Self {
            host,
            port,
            googlebooks_api_key,
            googlebooks_api_url,
            openlibrary_api_url,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
