//! Error types for zana-release

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReleaseError>;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid version: {0}")]
    Version(#[from] semver::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// File parsed but does not have the expected shape
    #[error("Unexpected document {path}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("No version field found in {0}")]
    VersionNotFound(PathBuf),

    #[error("Command '{command}' failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Configuration error: {0}")]
    Common(#[from] zana_common::Error),
}

impl ReleaseError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
