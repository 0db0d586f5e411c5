//! Error types for zana-addon

use thiserror::Error;

/// Result type for add-on operations
pub type Result<T> = std::result::Result<T, AddonError>;

/// Add-on error type
#[derive(Debug, Error)]
pub enum AddonError {
    /// Page has no element to mount injected nodes on
    #[error("Mount point not found: {0}")]
    MissingMountPoint(String),

    /// No host module is registered for the page's host
    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),

    /// CSS selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// URL pattern could not be compiled
    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// zana-common error
    #[error("Common error: {0}")]
    Common(#[from] zana_common::Error),
}
