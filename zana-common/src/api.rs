//! Wire types of the `/books` aggregation API
//!
//! These documents are produced by `zana-api` and consumed by the content
//! script in `zana-addon`, so both sides share one definition.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Book data provider supported by the aggregation API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    GoogleBooks,
    OpenLibrary,
}

impl ProviderType {
    /// Providers in query order. Merging gives earlier providers precedence.
    pub const ALL: [ProviderType; 2] = [ProviderType::GoogleBooks, ProviderType::OpenLibrary];

    /// Tag used in query strings and response documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::GoogleBooks => "googlebooks",
            ProviderType::OpenLibrary => "openlibrary",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "googlebooks" => Ok(Self::GoogleBooks),
            "openlibrary" => Ok(Self::OpenLibrary),
            other => Err(Error::InvalidInput(format!("unknown provider type: {}", other))),
        }
    }
}

/// Response used to represent a retrieved book.
///
/// Ratings are optional, since not every provider offers them and not every
/// book has ratings attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub data: BookData,
    #[serde(default)]
    pub rating: Option<RatingData>,
}

impl SuccessResponse {
    pub fn new(data: BookData) -> Self {
        Self { data, rating: None }
    }

    pub fn with_rating(mut self, rating: RatingData) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Represents a book and some of its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub provider_link: String,
}

impl BookData {
    pub fn new(page_count: u32, description: &str, provider_link: &str) -> Self {
        Self {
            page_count,
            description: description.to_string(),
            provider_link: provider_link.to_string(),
        }
    }
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Rating summary of a book at one provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingData {
    pub average_rating: f32,
    pub ratings_count: u32,
}

impl RatingData {
    pub fn new(average_rating: f32, ratings_count: u32) -> Self {
        Self {
            average_rating,
            ratings_count,
        }
    }
}

/// Response used to represent an error during request handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub error: String,
    pub details: String,
    pub status_code: u16,
}

impl fmt::Display for FailureResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error, self.details)
    }
}

impl std::error::Error for FailureResponse {}
