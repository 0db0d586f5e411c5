//! Background request listener
//!
//! Watches completed network requests of every tab. When a request matches a
//! target URL pattern and the configuration of its host, the content script
//! of that tab is told to refresh. Retailer pages that load product data
//! through XHR navigate without a full reload, so this is how the content
//! script learns about a new page state.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::events::TabMessage;

/// Browser tab identifier
pub type TabId = u32;

/// Buffered messages per tab before notifications are dropped
const TAB_CHANNEL_CAPACITY: usize = 16;

pub const DUKAGJINI_TARGET: &str = "https://dukagjinibooks.com/api/products/*";
pub const DUKAGJINI_HOST: &str = "dukagjinibooks.com";
pub const DUKAGJINI_PATTERN: &str = r"^https://dukagjinibooks\.com/api/products/\d+$";

/// Strips a leading `www.` from a host name
pub fn clean_host(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Compiles a match pattern where `*` matches any run of characters
pub fn glob_to_regex(glob: &str) -> Result<Regex> {
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Ok(Regex::new(&format!("^{}$", body))?)
}

/// Per-host filter applied after the target patterns
#[derive(Debug, Clone)]
pub struct HostRule {
    pub pattern: Regex,
    pub skip_pattern_check: bool,
}

/// A finished request observed in some tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRequest {
    pub url: String,
    pub tab_id: TabId,
}

impl CompletedRequest {
    pub fn new(url: &str, tab_id: TabId) -> Self {
        Self {
            url: url.to_string(),
            tab_id,
        }
    }
}

/// Decides which completed requests refresh a content script
#[derive(Debug, Clone, Default)]
pub struct RequestInterceptor {
    targets: Vec<Regex>,
    hosts: HashMap<String, HostRule>,
}

impl RequestInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interceptor for every supported retailer
    pub fn with_defaults() -> Result<Self> {
        Self::new()
            .with_target(DUKAGJINI_TARGET)?
            .with_host(DUKAGJINI_HOST, DUKAGJINI_PATTERN, false)
    }

    pub fn with_target(mut self, glob: &str) -> Result<Self> {
        self.targets.push(glob_to_regex(glob)?);
        Ok(self)
    }

    pub fn with_host(mut self, host: &str, pattern: &str, skip_pattern_check: bool) -> Result<Self> {
        self.hosts.insert(
            clean_host(host),
            HostRule {
                pattern: Regex::new(pattern)?,
                skip_pattern_check,
            },
        );
        Ok(self)
    }

    pub fn matches_target(&self, url: &str) -> bool {
        self.targets.iter().any(|target| target.is_match(url))
    }

    pub fn host_rule(&self, host: &str) -> Option<&HostRule> {
        self.hosts.get(&clean_host(host))
    }

    /// Whether a completed request to `url` should refresh the tab
    pub fn should_notify(&self, url: &str) -> bool {
        if !self.matches_target(url) {
            return false;
        }

        let host = match Url::parse(url) {
            Ok(parsed) => parsed.host_str().map(clean_host).unwrap_or_default(),
            Err(e) => {
                debug!(url = %url, error = %e, "Ignoring unparsable request URL");
                return false;
            }
        };

        match self.host_rule(&host) {
            Some(rule) => rule.skip_pattern_check || rule.pattern.is_match(url),
            None => false,
        }
    }
}

/// Message channels to the content scripts of open tabs
#[derive(Debug, Clone, Default)]
pub struct TabRouter {
    tabs: Arc<RwLock<HashMap<TabId, mpsc::Sender<TabMessage>>>>,
}

impl TabRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a channel for a tab's content script, replacing any previous one
    pub async fn register(&self, tab_id: TabId) -> mpsc::Receiver<TabMessage> {
        let (tx, rx) = mpsc::channel(TAB_CHANNEL_CAPACITY);
        self.tabs.write().await.insert(tab_id, tx);
        debug!(tab_id = tab_id, "Content script registered");
        rx
    }

    pub async fn unregister(&self, tab_id: TabId) {
        self.tabs.write().await.remove(&tab_id);
    }

    /// Sends an empty message to a tab; returns whether it was delivered
    pub async fn notify(&self, tab_id: TabId) -> bool {
        let sender = self.tabs.read().await.get(&tab_id).cloned();
        let Some(sender) = sender else {
            debug!(tab_id = tab_id, "No content script in tab");
            return false;
        };

        match sender.try_send(TabMessage) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(tab_id = tab_id, "Content script is not keeping up, message dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(tab_id = tab_id, "Content script went away");
                self.unregister(tab_id).await;
                false
            }
        }
    }
}

/// The background listener: interceptor plus tab router
#[derive(Debug, Clone)]
pub struct BackgroundListener {
    interceptor: RequestInterceptor,
    router: TabRouter,
}

impl BackgroundListener {
    pub fn new(interceptor: RequestInterceptor, router: TabRouter) -> Self {
        Self {
            interceptor,
            router,
        }
    }

    pub fn router(&self) -> &TabRouter {
        &self.router
    }

    /// Handles one completed request; returns whether a tab was notified
    pub async fn on_completed(&self, request: &CompletedRequest) -> bool {
        if !self.interceptor.should_notify(&request.url) {
            return false;
        }
        debug!(url = %request.url, tab_id = request.tab_id, "Product request completed");
        self.router.notify(request.tab_id).await
    }

    /// Processes completed requests until the stream closes
    pub async fn run(self, mut requests: mpsc::Receiver<CompletedRequest>) {
        info!("Background listener started");
        while let Some(request) = requests.recv().await {
            self.on_completed(&request).await;
        }
        info!("Background listener stopped");
    }
}
