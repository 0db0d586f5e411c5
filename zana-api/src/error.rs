//! Error types for zana-api
//!
//! Every error is rendered as a [`FailureResponse`] JSON document. The status
//! code and details come from the error itself so the content script can pick
//! its message from the status alone.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use zana::ClientError;
use zana_common::FailureResponse;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request parameter is missing or invalid (400)
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Error returned by a provider client
    #[error(transparent)]
    BookClient(#[from] ClientError),
}

impl ApiError {
    /// Error name reported in the `error` field
    pub fn name(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "MissingParameter",
            ApiError::BookClient(err) => match err {
                ClientError::RateLimitExceeded => "RateLimitExceeded",
                ClientError::NotFound => "NotFound",
                ClientError::Unsupported(_) => "Unsupported",
                ClientError::Http(_, _) | ClientError::InternalClient(_) => "HttpClientError",
            },
        }
    }

    /// HTTP status and user-facing details for this error
    pub fn status_and_details(&self) -> (u16, String) {
        match self {
            ApiError::MissingParameter(details) => (400, details.clone()),
            ApiError::BookClient(err) => match err {
                ClientError::InternalClient(_) => (
                    503,
                    "Could not retrieve data from external service".to_string(),
                ),
                ClientError::RateLimitExceeded => (
                    429,
                    "Rate limit exceeded for external service".to_string(),
                ),
                ClientError::NotFound => (404, "Book not found".to_string()),
                ClientError::Http(status_code, details) => (*status_code, details.clone()),
                ClientError::Unsupported(details) => (400, details.to_string()),
            },
        }
    }

    pub fn to_failure_response(&self) -> FailureResponse {
        let (status_code, details) = self.status_and_details();
        FailureResponse {
            error: self.name().to_string(),
            details,
            status_code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let failure = self.to_failure_response();
        let status = StatusCode::from_u16(failure.status_code)
            .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);

        (status, Json(failure)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
