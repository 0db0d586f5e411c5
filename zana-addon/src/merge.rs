//! Reconciliation of provider responses into display fields
//!
//! Responses are considered in query order: the first provider with a
//! non-empty value wins for scalar fields, while every available rating is
//! kept.

use zana_common::{ProviderType, RatingData, SuccessResponse};

use crate::provider::ProviderResponse;

/// Status of a response that carries book data
const OK_STATUS: u16 = 200;

/// Responses with status 200 and a book document, in order
pub fn successful(responses: &[ProviderResponse]) -> Vec<(ProviderType, &SuccessResponse)> {
    responses
        .iter()
        .filter(|response| response.status == OK_STATUS)
        .filter_map(|response| response.book().map(|book| (response.provider, book)))
        .collect()
}

/// One provider's rating with its attribution link
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRating {
    pub provider: ProviderType,
    pub rating: RatingData,
    pub provider_link: String,
}

/// Display fields merged across providers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedBook {
    pub number_of_pages: Option<u32>,
    pub description: Option<String>,
    pub ratings: Vec<ProviderRating>,
}

pub fn merge(responses: &[ProviderResponse]) -> MergedBook {
    let books = successful(responses);

    let number_of_pages = books
        .iter()
        .map(|(_, book)| book.data.page_count)
        .find(|pages| *pages > 0);

    let description = books
        .iter()
        .map(|(_, book)| book.data.description.as_str())
        .find(|description| !description.is_empty())
        .map(str::to_string);

    let ratings = books
        .iter()
        .filter_map(|(provider, book)| {
            book.rating.map(|rating| ProviderRating {
                provider: *provider,
                rating,
                provider_link: book.data.provider_link.clone(),
            })
        })
        .collect();

    MergedBook {
        number_of_pages,
        description,
        ratings,
    }
}

/// Why no provider returned data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    RateLimited,
    Unavailable,
}

impl FailureKind {
    /// 404 takes precedence over 429; anything else is a generic failure
    pub fn from_statuses(statuses: impl IntoIterator<Item = u16>) -> Self {
        let statuses: Vec<u16> = statuses.into_iter().collect();
        if statuses.contains(&404) {
            FailureKind::NotFound
        } else if statuses.contains(&429) {
            FailureKind::RateLimited
        } else {
            FailureKind::Unavailable
        }
    }

    /// Message shown after the app name
    pub fn message(&self) -> &'static str {
        match self {
            FailureKind::NotFound => "did not find any data for this book.",
            FailureKind::RateLimited => {
                "has reached the maximum number of requests. Please try again later."
            }
            FailureKind::Unavailable => {
                "is having trouble retrieving book data at the moment. Please try again later."
            }
        }
    }
}

pub fn failure_message(statuses: impl IntoIterator<Item = u16>) -> &'static str {
    FailureKind::from_statuses(statuses).message()
}
