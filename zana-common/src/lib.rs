//! # Zana Common Library
//!
//! Shared code for the Zana crates:
//! - Error type and result alias
//! - Configuration loading (TOML → environment → command line)
//! - Tracing subscriber setup
//! - Wire types of the `/books` aggregation API

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{BookData, FailureResponse, ProviderType, RatingData, SuccessResponse};
pub use error::{Error, Result};
