//! Google Books client
//!
//! Queries the `volumes` endpoint and uses the first matching item.
//!
//! # API Reference
//! - Endpoint: `{api_url}/books/v1/volumes`
//! - Documentation: https://developers.google.com/books/docs/v1/using

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{check_status, create_http_client, Book, BookClient, ClientError, Rating};

const VOLUMES_PATH: &str = "/books/v1/volumes";

/// Public book page used when a volume carries no `infoLink`
const BOOK_PAGE_URL: &str = "https://books.google.com/books";

/// Client used to retrieve data from Google Books API.
pub struct Client {
    api_key: String,
    api_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a client that makes requests with `api_key` against `api_url`
    /// (normally `https://www.googleapis.com`).
    pub fn new(api_key: &str, api_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api_key: api_key.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client: create_http_client()?,
        })
    }

    fn create_book(&self, items: Vec<VolumeItem>) -> Result<Book, ClientError> {
        let Some(item) = items.into_iter().next() else {
            return Err(ClientError::NotFound);
        };
        let info = item.info;

        let provider_link = info
            .info_link
            .filter(|link| !link.is_empty())
            .unwrap_or_else(|| format!("{}?id={}", BOOK_PAGE_URL, item.id));
        let description = info.description.unwrap_or_default();
        let page_count = info.page_count.unwrap_or(0);

        match Rating::from_parts(info.average_rating, info.ratings_count) {
            Some(rating) => Ok(Book::new_with_rating(
                page_count,
                &description,
                &provider_link,
                rating,
            )),
            None => {
                debug!(
                    volume_id = %item.id,
                    average_rating = ?info.average_rating,
                    ratings_count = ?info.ratings_count,
                    "Ratings not added for volume"
                );
                Ok(Book::new(page_count, &description, &provider_link))
            }
        }
    }

    async fn fetch_book(&self, query: &str) -> Result<Book, ClientError> {
        debug!(query = %query, "Querying Google Books volumes");

        let query_list: [(&str, &str); 4] = [
            ("key", &self.api_key),
            ("maxResults", "1"),
            ("fields", "items"),
            ("q", query),
        ];

        let response = self
            .http_client
            .get(format!("{}{}", self.api_url, VOLUMES_PATH))
            .query(&query_list)
            .send()
            .await?;

        let volume: Volume = check_status(response).await?.json().await?;

        match volume.items {
            Some(items) => self.create_book(items),
            None => Err(ClientError::NotFound),
        }
    }
}

#[async_trait]
impl BookClient for Client {
    fn name(&self) -> &'static str {
        "googlebooks"
    }

    async fn book_by_isbn(&self, isbn: &str) -> Result<Book, ClientError> {
        self.fetch_book(&format!("isbn:{}", isbn)).await
    }

    async fn book(&self, author: &str, title: &str) -> Result<Book, ClientError> {
        self.fetch_book(&format!("inauthor:{} intitle:{}", author, title))
            .await
    }
}

// ============================================================================
// Google Books API Response Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct Volume {
    items: Option<Vec<VolumeItem>>,
}

#[derive(Deserialize, Debug)]
struct VolumeItem {
    id: String,
    #[serde(rename = "volumeInfo")]
    info: VolumeInfo,
}

#[derive(Deserialize, Debug)]
struct VolumeInfo {
    description: Option<String>,
    #[serde(rename = "pageCount")]
    page_count: Option<u32>,
    #[serde(rename = "averageRating")]
    average_rating: Option<f32>,
    #[serde(rename = "ratingsCount")]
    ratings_count: Option<u32>,
    #[serde(rename = "infoLink")]
    info_link: Option<String>,
}
