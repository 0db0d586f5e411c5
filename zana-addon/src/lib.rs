//! # zana-addon
//!
//! The browser side of Zana, modelled as async tasks:
//! - [`background`]: watches completed requests and pokes content scripts
//! - [`content`]: scrapes the ISBN, queries providers, emits book data events
//! - [`hosts`]: per-retailer scraping and rendering
//! - [`merge`]: reconciles provider responses into display fields

pub mod background;
pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod hosts;
pub mod merge;
pub mod page;
pub mod provider;
pub mod render;

pub use background::{BackgroundListener, CompletedRequest, RequestInterceptor, TabRouter};
pub use content::ContentScript;
pub use error::{AddonError, Result};
pub use events::{BookDataEvent, EventBus, TabMessage};
pub use hosts::{Assets, HostModule, HostRegistry};
pub use page::Page;
pub use provider::{BooksApi, HttpBooksApi, ProviderResponse, ResponseBody};
