//! # Zana book clients
//!
//! Retrieves book data from third-party book APIs:
//! - [Google Books](https://developers.google.com/books) via [`googlebooks::Client`]
//! - [OpenLibrary](https://openlibrary.org/) via [`openlibrary::Client`]
//!
//! Both clients implement [`BookClient`] and aggregate whatever they fetch into
//! a single [`Book`].
//!
//! # Example
//! ```rust,ignore
//! use zana::{BookClient, openlibrary};
//!
//! let client = openlibrary::Client::new("https://openlibrary.org")?;
//! let book = client.book_by_isbn("9780316387316").await?;
//! println!("{} pages", book.page_count);
//! ```
//!
//! # Errors
//! A book that the provider does not know is reported as
//! [`ClientError::NotFound`]; rate limiting has its own variant because callers
//! surface it differently to users.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod googlebooks;
pub mod openlibrary;

/// Request and connect timeout for provider calls
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error returned by [`BookClient`] implementations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure from the internal HTTP client (timeout, connection, decoding)
    #[error("error coming from internal http client: {0}")]
    InternalClient(#[from] reqwest::Error),

    /// 429 (or 403 for providers that use it for quotas)
    #[error("rate limit exceeded for external service")]
    RateLimitExceeded,

    /// Provider has no data for the requested book
    #[error("book not found")]
    NotFound,

    /// Any other non-success status, with the response body
    #[error("http error {0}: {1}")]
    Http(u16, String),

    /// Provider does not offer this kind of lookup
    #[error("operation not supported by provider: {0}")]
    Unsupported(&'static str),
}

/// Book data aggregated from one provider
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub page_count: u32,
    pub description: String,
    /// Link to the book's page at the provider
    pub provider_link: String,
    pub rating: Option<Rating>,
}

/// Average rating and number of ratings at one provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    pub average_rating: f32,
    pub ratings_count: u32,
}

impl Book {
    pub fn new(page_count: u32, description: &str, provider_link: &str) -> Self {
        Self {
            page_count,
            description: description.to_string(),
            provider_link: provider_link.to_string(),
            rating: None,
        }
    }

    pub fn new_with_rating(
        page_count: u32,
        description: &str,
        provider_link: &str,
        rating: Rating,
    ) -> Self {
        let mut book = Book::new(page_count, description, provider_link);
        book.rating = Some(rating);
        book
    }
}

impl Rating {
    /// Only meant for ratings that exist, i.e. `ratings_count > 0`.
    pub fn new(average_rating: f32, ratings_count: u32) -> Self {
        Self {
            average_rating,
            ratings_count,
        }
    }

    /// Returns a rating when both values are present and non-zero
    pub fn from_parts(average_rating: Option<f32>, ratings_count: Option<u32>) -> Option<Self> {
        match (average_rating, ratings_count) {
            (Some(average), Some(count)) if average > 0.0 && count > 0 => {
                Some(Self::new(average, count))
            }
            _ => None,
        }
    }
}

/// Client for one third-party book API
///
/// Providers that cannot serve a lookup return [`ClientError::Unsupported`].
#[async_trait]
pub trait BookClient: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &'static str;

    /// Returns a book by ISBN
    async fn book_by_isbn(&self, isbn: &str) -> Result<Book, ClientError>;

    /// Returns a book by author and title
    async fn book(&self, author: &str, title: &str) -> Result<Book, ClientError>;
}

/// Maps provider status codes that every client treats the same way.
///
/// Returns `Ok(response)` for 2xx.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status_code = response.status().as_u16();
    match status_code {
        200..=299 => Ok(response),
        404 => Err(ClientError::NotFound),
        429 | 403 => Err(ClientError::RateLimitExceeded),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Http(status_code, body))
        }
    }
}

pub(crate) fn create_http_client() -> Result<reqwest::Client, ClientError> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(reqwest::Client::builder()
        .user_agent(format!("zana/{} (gzip)", version))
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_TIMEOUT)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_requires_both_parts() {
        assert_eq!(Rating::from_parts(Some(4.2), Some(10)), Some(Rating::new(4.2, 10)));
        assert_eq!(Rating::from_parts(Some(4.2), None), None);
        assert_eq!(Rating::from_parts(None, Some(10)), None);
        assert_eq!(Rating::from_parts(Some(0.0), Some(10)), None);
        assert_eq!(Rating::from_parts(Some(3.0), Some(0)), None);
    }

    #[test]
    fn test_book_with_rating() {
        let book = Book::new_with_rating(100, "desc", "link", Rating::new(4.0, 2));
        assert_eq!(book.rating, Some(Rating::new(4.0, 2)));
        assert_eq!(book.provider_link, "link");
    }
}
