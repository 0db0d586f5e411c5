//! Per-retailer host modules
//!
//! A host module knows how one retailer lays out its product pages: where
//! the ISBN lives, where to show progress and how to render the merged book
//! data. The content script picks a module by the page's cleaned host.

use std::collections::HashMap;
use std::sync::Arc;

use crate::background::clean_host;
use crate::error::Result;
use crate::events::BookDataEvent;
use crate::page::Page;

pub mod dukagjini;

pub use dukagjini::DukagjiniBooks;

/// Retailer-specific behaviour of the content script
pub trait HostModule: Send + Sync {
    /// Cleaned host name the module serves
    fn host(&self) -> &'static str;

    /// Name of the custom event carrying book data to this module
    fn event_name(&self) -> &'static str;

    /// Whether the content script should fetch book data at all
    fn query_book_data(&self) -> bool;

    /// ISBN of the product shown on `page`, if any
    fn retrieve_isbn(&self, page: &Page) -> Option<String>;

    /// Shows a loading indicator
    fn loading(&self, page: &mut Page) -> Result<()>;

    /// Renders the provider responses carried by `event`
    fn handle(&self, page: &mut Page, event: &BookDataEvent) -> Result<()>;
}

/// Resolves packaged extension assets (the browser's `runtime.getURL`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets {
    base_url: String,
}

impl Assets {
    /// An empty base keeps asset paths relative
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

/// Host modules keyed by cleaned host
#[derive(Clone, Default)]
pub struct HostRegistry {
    modules: HashMap<String, Arc<dyn HostModule>>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported retailer
    pub fn with_defaults(assets: Assets) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DukagjiniBooks::new(assets)));
        registry
    }

    pub fn register(&mut self, module: Arc<dyn HostModule>) {
        self.modules.insert(clean_host(module.host()), module);
    }

    pub fn get(&self, host: &str) -> Option<Arc<dyn HostModule>> {
        self.modules.get(&clean_host(host)).cloned()
    }
}
