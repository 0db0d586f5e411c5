//! Release configuration
//!
//! ```toml
//! version_file = "VERSION"
//!
//! [[projects]]
//! path = "services/zana/Cargo.toml"
//! type = "rust_crate"
//! lock_package = "zana"
//! ```
//!
//! Paths are relative to the repository root. Without a config file, or
//! without a `projects` table, the built-in project list is used.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use zana_common::config::{load_toml_config, LoggingConfig};

use crate::error::Result;
use crate::project::{Project, ProjectType};

pub const DEFAULT_VERSION_FILE: &str = "VERSION";

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseConfig {
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,
    #[serde(default = "default_projects")]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            version_file: default_version_file(),
            projects: default_projects(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ReleaseConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(load_toml_config(path)?)
    }
}

fn default_version_file() -> PathBuf {
    PathBuf::from(DEFAULT_VERSION_FILE)
}

/// Every project of the Zana repository
pub fn default_projects() -> Vec<Project> {
    vec![
        Project::new("extension/addon/manifest.json", ProjectType::Manifest),
        Project::new("extension/platform/chrome/manifest.json", ProjectType::Manifest),
        Project::new("extension/package.json", ProjectType::Npm),
        Project::new("services/zana/Cargo.toml", ProjectType::RustCrate).with_lock_package("zana"),
        Project::new("services/zana_lambda/Cargo.toml", ProjectType::RustCrate)
            .with_lock_package("zana"),
        Project::new("deployment/zana_aws/pom.xml", ProjectType::Maven),
        Project::new("tools/release/package.json", ProjectType::Npm),
    ]
}
