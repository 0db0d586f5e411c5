//! zana-api library
//!
//! Aggregation service queried by the Zana content script. Each request names
//! one provider; the content script fans out over providers itself.

use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod book;
pub mod config;
pub mod error;

pub use crate::book::BookService;
pub use crate::error::{ApiError, ApiResult};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Provider routing for book lookups
    pub books: Arc<BookService>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(books: BookService) -> Self {
        Self {
            books: Arc::new(books),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS is open for GET because the content script runs on third-party origins.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .merge(api::book_routes())
        .merge(api::health_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
