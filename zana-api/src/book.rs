//! Provider selection for book lookups
//!
//! [`BookService`] holds one [`BookClient`] per [`ProviderType`] and routes each
//! lookup to the requested provider.

use std::sync::Arc;

use tracing::debug;
use zana::{Book, BookClient};
use zana_common::ProviderType;

use crate::error::{ApiError, ApiResult};

/// Shared provider client handle
pub type BookApiClient = Arc<dyn BookClient>;

/// Routes lookups to the provider named in the request
pub struct BookService {
    googlebooks_client: BookApiClient,
    openlibrary_client: BookApiClient,
}

impl BookService {
    pub fn new(googlebooks_client: BookApiClient, openlibrary_client: BookApiClient) -> Self {
        Self {
            googlebooks_client,
            openlibrary_client,
        }
    }

    fn client_for(&self, provider: ProviderType) -> &dyn BookClient {
        match provider {
            ProviderType::GoogleBooks => self.googlebooks_client.as_ref(),
            ProviderType::OpenLibrary => self.openlibrary_client.as_ref(),
        }
    }

    /// Returns a book from `provider`.
    ///
    /// ISBN takes precedence over title and author. When neither an ISBN nor
    /// both title and author are given, a `MissingParameter` error is returned.
    pub async fn fetch_book(
        &self,
        provider: ProviderType,
        isbn: &str,
        title: &str,
        author: &str,
    ) -> ApiResult<Book> {
        let client = self.client_for(provider);

        if !isbn.is_empty() {
            debug!(isbn = %isbn, provider = client.name(), "Fetching book by ISBN");
            Ok(client.book_by_isbn(isbn).await?)
        } else if !title.is_empty() && !author.is_empty() {
            debug!(
                title = %title,
                author = %author,
                provider = client.name(),
                "Fetching book by title and author"
            );
            Ok(client.book(author, title).await?)
        } else {
            Err(ApiError::MissingParameter(
                "Either ISBN or title and author must be provided".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use zana::ClientError;

    struct StubClient {
        isbn: &'static str,
        title: &'static str,
        author: &'static str,
        pages: u32,
    }

    impl StubClient {
        fn with_isbn(isbn: &'static str, pages: u32) -> Self {
            Self {
                isbn,
                title: "",
                author: "",
                pages,
            }
        }

        fn with_title_and_author(title: &'static str, author: &'static str, pages: u32) -> Self {
            Self {
                isbn: "",
                title,
                author,
                pages,
            }
        }

        fn empty() -> Self {
            Self::with_isbn("", 0)
        }
    }

    #[async_trait]
    impl BookClient for StubClient {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn book_by_isbn(&self, isbn: &str) -> Result<Book, ClientError> {
            if !self.isbn.is_empty() && self.isbn == isbn {
                Ok(Book::new(self.pages, "Book description", "http://localhost/book"))
            } else {
                Err(ClientError::NotFound)
            }
        }

        async fn book(&self, author: &str, title: &str) -> Result<Book, ClientError> {
            if !self.title.is_empty() && self.title == title && self.author == author {
                Ok(Book::new(self.pages, "Book description", "http://localhost/book"))
            } else {
                Err(ClientError::NotFound)
            }
        }
    }

    #[tokio::test]
    async fn test_missing_lookup_parameters() {
        let service = BookService::new(Arc::new(StubClient::empty()), Arc::new(StubClient::empty()));

        let result = service
            .fetch_book(ProviderType::OpenLibrary, "", "Title only", "")
            .await;

        match result {
            Err(ApiError::MissingParameter(message)) => {
                assert_eq!("Either ISBN or title and author must be provided", message)
            }
            other => panic!("expected MissingParameter, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_isbn_routes_to_requested_provider() {
        let service = BookService::new(
            Arc::new(StubClient::empty()),
            Arc::new(StubClient::with_isbn("9781591026419", 100)),
        );

        let book = service
            .fetch_book(ProviderType::OpenLibrary, "9781591026419", "", "")
            .await
            .unwrap();
        assert_eq!(book.page_count, 100);

        let result = service
            .fetch_book(ProviderType::GoogleBooks, "9781591026419", "", "")
            .await;
        assert!(matches!(result, Err(ApiError::BookClient(ClientError::NotFound))));
    }

    #[tokio::test]
    async fn test_title_and_author_lookup() {
        let service = BookService::new(
            Arc::new(StubClient::with_title_and_author("Book title", "Author Rothua", 321)),
            Arc::new(StubClient::empty()),
        );

        let book = service
            .fetch_book(ProviderType::GoogleBooks, "", "Book title", "Author Rothua")
            .await
            .unwrap();
        assert_eq!(book.page_count, 321);
    }
}
