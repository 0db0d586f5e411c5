//! Book data retrieval from the aggregation API
//!
//! Every provider query resolves to a [`ProviderResponse`]. Transport and
//! decoding failures are folded into a status 500 response instead of an
//! error, so one failing provider never hides the other's data.

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use zana_common::{FailureResponse, ProviderType, SuccessResponse};

use crate::error::Result;

/// Aggregation API endpoint used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://api.zanareads.com/books";

/// Status reported for requests that never produced a usable response
pub const FETCH_FAILED_STATUS: u16 = 500;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one provider query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub isbn: String,
    pub body: ResponseBody,
    pub status: u16,
    #[serde(rename = "type")]
    pub provider: ProviderType,
}

impl ProviderResponse {
    pub fn new(isbn: &str, provider: ProviderType, status: u16, body: ResponseBody) -> Self {
        Self {
            isbn: isbn.to_string(),
            body,
            status,
            provider,
        }
    }

    /// Response standing in for a request that failed before yielding JSON
    pub fn failed(isbn: &str, provider: ProviderType, message: &str) -> Self {
        Self::new(
            isbn,
            provider,
            FETCH_FAILED_STATUS,
            ResponseBody::Error {
                error: message.to_string(),
            },
        )
    }

    /// Book document, if the body is one
    pub fn book(&self) -> Option<&SuccessResponse> {
        match &self.body {
            ResponseBody::Success(book) => Some(book),
            _ => None,
        }
    }
}

/// Decoded response body
///
/// Variants are tried in order; anything unrecognised is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success(SuccessResponse),
    Failure(FailureResponse),
    Error { error: String },
    Other(Value),
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(ResponseBody::Other(value))
    }
}

/// Source of provider responses
#[async_trait]
pub trait BooksApi: Send + Sync {
    /// Query one provider for `isbn`. Never fails; failures are status 500.
    async fn query(&self, provider: ProviderType, isbn: &str) -> ProviderResponse;
}

/// [`BooksApi`] backed by the aggregation API over HTTP
pub struct HttpBooksApi {
    api_url: Url,
    http_client: reqwest::Client,
}

impl HttpBooksApi {
    pub fn new(api_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(format!("zana-addon/{}", env!("CARGO_PKG_VERSION")))
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_url: Url::parse(api_url)?,
            http_client,
        })
    }

    /// `{api_url}?type={provider}&isbn={isbn}`
    pub fn query_url(&self, provider: ProviderType, isbn: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("type", provider.as_str())
            .append_pair("isbn", isbn);
        url
    }

    async fn fetch(&self, url: Url) -> std::result::Result<(u16, Value), reqwest::Error> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl BooksApi for HttpBooksApi {
    async fn query(&self, provider: ProviderType, isbn: &str) -> ProviderResponse {
        let url = self.query_url(provider, isbn);
        debug!(provider = %provider, isbn = %isbn, url = %url, "Querying book data");

        match self.fetch(url).await {
            Ok((status, body)) => {
                debug!(provider = %provider, status = status, "Book data received");
                ProviderResponse::new(isbn, provider, status, ResponseBody::from(body))
            }
            Err(e) => {
                error!(provider = %provider, isbn = %isbn, error = %e, "Book data request failed");
                ProviderResponse::failed(isbn, provider, &e.to_string())
            }
        }
    }
}

/// Query every provider in parallel; responses come back in query order
pub async fn retrieve_book_data(api: &dyn BooksApi, isbn: &str) -> Vec<ProviderResponse> {
    let queries = ProviderType::ALL
        .iter()
        .map(|provider| api.query(*provider, isbn));
    join_all(queries).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use zana_common::BookData;

    #[test]
    fn test_body_decodes_success_document() {
        let body = ResponseBody::from(json!({
            "data": {"page_count": 542, "description": "A book", "provider_link": "http://x"},
            "rating": {"average_rating": 4.0, "ratings_count": 12}
        }));
        match body {
            ResponseBody::Success(book) => {
                assert_eq!(book.data, BookData::new(542, "A book", "http://x"));
                assert_eq!(book.rating.unwrap().ratings_count, 12);
            }
            other => panic!("Expected success document, got {:?}", other),
        }
    }

    #[test]
    fn test_body_decodes_failure_document() {
        let body = ResponseBody::from(json!({
            "error": "NotFound", "details": "Book not found", "status_code": 404
        }));
        assert!(matches!(body, ResponseBody::Failure(f) if f.status_code == 404));
    }

    #[test]
    fn test_body_keeps_unknown_json() {
        let body = ResponseBody::from(json!([1, 2, 3]));
        assert_eq!(body, ResponseBody::Other(json!([1, 2, 3])));
    }

    #[test]
    fn test_response_serializes_provider_as_type() {
        let response = ProviderResponse::failed("123", ProviderType::OpenLibrary, "boom");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "openlibrary");
        assert_eq!(value["status"], 500);
        assert_eq!(value["body"]["error"], "boom");
        assert!(response.book().is_none());
    }

    #[test]
    fn test_query_url() {
        let api = HttpBooksApi::new(DEFAULT_API_URL).unwrap();
        assert_eq!(
            api.query_url(ProviderType::GoogleBooks, "9789951").as_str(),
            "https://api.zanareads.com/books?type=googlebooks&isbn=9789951"
        );
    }
}
