//! OpenLibrary client
//!
//! Three calls are made per book and their data aggregated:
//! 1. `/isbn/{isbn}.json` for the edition (page count, work key)
//! 2. `{work}.json` for the description
//! 3. `{work}/ratings.json` for the rating summary
//!
//! OpenLibrary has no author/title lookup that maps onto a single edition, so
//! [`BookClient::book`] is unsupported.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::{check_status, create_http_client, Book, BookClient, ClientError, Rating};

const ISBN_PATH: &str = "/isbn";
const RATINGS_PATH: &str = "/ratings";

/// Client used to retrieve data from OpenLibrary API. No API key is required.
pub struct Client {
    api_url: String,
    http_client: reqwest::Client,
}

impl Client {
    /// Returns a client that makes requests against `api_url`
    /// (normally `https://openlibrary.org`).
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client: create_http_client()?,
        })
    }

    fn create_book(
        &self,
        work_path: &str,
        edition: &EditionResponse,
        work: &WorkResponse,
        ratings: &RatingsResponse,
    ) -> Book {
        let description = match &work.description {
            Some(Description::Text(text)) => text.as_str(),
            Some(Description::Typed { value }) => value.as_str(),
            None => "",
        };
        let provider_link = format!("{}{}", self.api_url, work_path);

        let mut book = Book::new(
            edition.number_of_pages.unwrap_or(0),
            description,
            &provider_link,
        );
        book.rating = Rating::from_parts(ratings.summary.average, ratings.summary.count);
        book
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.api_url, path);
        debug!(url = %url, "Querying OpenLibrary");

        let response = self.http_client.get(&url).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn fetch_book(&self, isbn: &str) -> Result<Book, ClientError> {
        let edition: EditionResponse = self
            .get_json(&format!("{}/{}.json", ISBN_PATH, isbn))
            .await?;

        let Some(work) = edition.works.first() else {
            debug!(isbn = %isbn, "No work identifier found for edition on OpenLibrary");
            return Err(ClientError::NotFound);
        };
        let work_path = work.key.clone();

        let work: WorkResponse = self.get_json(&format!("{}.json", work_path)).await?;
        let ratings: RatingsResponse = self
            .get_json(&format!("{}{}.json", work_path, RATINGS_PATH))
            .await?;

        Ok(self.create_book(&work_path, &edition, &work, &ratings))
    }
}

#[async_trait]
impl BookClient for Client {
    fn name(&self) -> &'static str {
        "openlibrary"
    }

    async fn book_by_isbn(&self, isbn: &str) -> Result<Book, ClientError> {
        self.fetch_book(isbn).await
    }

    async fn book(&self, _author: &str, _title: &str) -> Result<Book, ClientError> {
        Err(ClientError::Unsupported(
            "OpenLibrary does not support lookup by author and title",
        ))
    }
}

// ============================================================================
// OpenLibrary API Response Types
// ============================================================================

#[derive(Deserialize, Debug)]
struct EditionResponse {
    number_of_pages: Option<u32>,
    #[serde(default)]
    works: Vec<WorkIdentifier>,
}

#[derive(Deserialize, Debug)]
struct WorkIdentifier {
    key: String,
}

#[derive(Deserialize, Debug)]
struct WorkResponse {
    description: Option<Description>,
}

/// Work descriptions come either as a plain string or as a typed text value
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Description {
    Text(String),
    Typed { value: String },
}

#[derive(Deserialize, Debug)]
struct RatingsResponse {
    summary: RatingSummary,
}

#[derive(Deserialize, Debug)]
struct RatingSummary {
    average: Option<f32>,
    count: Option<u32>,
}
