//! GET /books
//!
//! Query parameters:
//! - `type`: provider (`googlebooks` | `openlibrary`), required
//! - `isbn`: takes precedence when present
//! - `title` + `author`: used when no ISBN is given
//!
//! A repeated parameter keeps its first value.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::warn;
use zana::Book;
use zana_common::{BookData, ProviderType, RatingData, SuccessResponse};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Raw query string of a book request
#[derive(Debug, Default)]
pub struct BookQuery {
    pub provider: Option<String>,
    pub isbn: String,
    pub title: String,
    pub author: String,
}

impl BookQuery {
    /// Collects the known parameters, keeping the first value of each
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs.into_iter().rev() {
            match key.as_str() {
                "type" => query.provider = Some(value),
                "isbn" => query.isbn = value,
                "title" => query.title = value,
                "author" => query.author = value,
                _ => {}
            }
        }
        query
    }

    /// Returns the provider named by the `type` parameter
    pub fn provider_type(&self) -> ApiResult<ProviderType> {
        let Some(provider) = self.provider.as_deref() else {
            return Err(ApiError::MissingParameter("Type is required".to_string()));
        };
        provider
            .parse()
            .map_err(|_| ApiError::MissingParameter("Invalid type".to_string()))
    }
}

/// Converts a provider book into the wire document
pub fn success_response(book: &Book) -> SuccessResponse {
    let response = SuccessResponse::new(BookData::new(
        book.page_count,
        &book.description,
        &book.provider_link,
    ));

    match &book.rating {
        Some(rating) => {
            response.with_rating(RatingData::new(rating.average_rating, rating.ratings_count))
        }
        None => response,
    }
}

/// GET /books
pub async fn get_book(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Query(pairs) = query.map_err(|e| ApiError::MissingParameter(e.body_text()))?;
    let query = BookQuery::from_pairs(pairs);
    let provider = query.provider_type()?;

    let book = state
        .books
        .fetch_book(provider, query.isbn.trim(), query.title.trim(), query.author.trim())
        .await
        .map_err(|e| {
            warn!(
                provider = %provider,
                isbn = %query.isbn,
                error = %e,
                "Book lookup failed"
            );
            e
        })?;

    Ok(Json(success_response(&book)))
}

/// Build book routes
pub fn book_routes() -> Router<AppState> {
    Router::new().route("/books", get(get_book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zana::Rating;

    #[test]
    fn test_provider_type_is_required() {
        let query = BookQuery::default();
        match query.provider_type() {
            Err(ApiError::MissingParameter(message)) => assert_eq!(message, "Type is required"),
            other => panic!("expected MissingParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_type_must_be_known() {
        let query = BookQuery {
            provider: Some("amazon".to_string()),
            ..Default::default()
        };
        match query.provider_type() {
            Err(ApiError::MissingParameter(message)) => assert_eq!(message, "Invalid type"),
            other => panic!("expected MissingParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_first_value_of_repeated_parameter_wins() {
        let query = BookQuery::from_pairs(vec![
            ("type".to_string(), "openlibrary".to_string()),
            ("isbn".to_string(), "9780261102385".to_string()),
            ("isbn".to_string(), "1".to_string()),
            ("type".to_string(), "googlebooks".to_string()),
            ("page".to_string(), "2".to_string()),
        ]);

        assert_eq!(query.provider.as_deref(), Some("openlibrary"));
        assert_eq!(query.isbn, "9780261102385");
        assert!(query.title.is_empty());
    }

    #[test]
    fn test_success_response_carries_rating() {
        let book = Book::new_with_rating(
            321,
            "Book description",
            "http://localhost/link/to/book",
            Rating::new(4.25, 12),
        );

        let response = success_response(&book);

        assert_eq!(response.data.page_count, 321);
        assert_eq!(response.data.provider_link, "http://localhost/link/to/book");
        assert_eq!(response.rating, Some(RatingData::new(4.25, 12)));
    }

    #[test]
    fn test_success_response_without_rating() {
        let book = Book::new(10, "", "http://localhost/link/to/book");
        assert!(success_response(&book).rating.is_none());
    }
}
