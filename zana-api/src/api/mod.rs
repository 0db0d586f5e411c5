//! HTTP handlers

pub mod books;
pub mod health;

pub use books::{book_routes, get_book, BookQuery};
pub use health::{health_check, health_routes};
