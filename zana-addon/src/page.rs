//! The host page as seen by a content script
//!
//! A [`Page`] keeps the retailer's HTML as delivered and the fragments the
//! add-on injected on top of it. The document is parsed on demand with
//! `scraper`; injected fragments are tracked as [`Mount`]s so they can be
//! found, removed and serialized again. Navigating replaces the document and
//! drops every mount, just like a new page state in the browser.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AddonError, Result};
use crate::render::Element;

/// A fragment appended to an element of the document
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    /// Selector of the element the fragment was appended to
    pub target: String,
    pub node: Element,
}

#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    html: String,
    mounts: Vec<Mount>,
}

impl Page {
    pub fn new(url: &str, html: impl Into<String>) -> Result<Self> {
        Ok(Self {
            url: Url::parse(url)?,
            html: html.into(),
            mounts: Vec::new(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host of the page URL without a leading `www.`
    pub fn host(&self) -> String {
        crate::background::clean_host(self.url.host_str().unwrap_or_default())
    }

    /// Parses the current document
    ///
    /// The parsed tree is not `Send`; keep it out of `.await` points.
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Replaces the page state
    pub fn navigate(&mut self, url: &str, html: impl Into<String>) -> Result<()> {
        self.url = Url::parse(url)?;
        self.html = html.into();
        self.mounts.clear();
        Ok(())
    }

    /// Appends `node` to the first element matching `target`
    pub fn append(&mut self, target: &str, node: Element) -> Result<()> {
        let selector = parse_selector(target)?;
        if self.document().select(&selector).next().is_none() {
            return Err(AddonError::MissingMountPoint(target.to_string()));
        }
        self.mounts.push(Mount {
            target: target.to_string(),
            node,
        });
        Ok(())
    }

    /// Removes injected fragments whose root carries `class`; returns how many went
    pub fn remove_class(&mut self, class: &str) -> usize {
        let before = self.mounts.len();
        self.mounts.retain(|mount| !mount.node.has_class(class));
        before - self.mounts.len()
    }

    /// Whether any element, from the document or injected, carries `class`
    pub fn contains_class(&self, class: &str) -> bool {
        if self
            .mounts
            .iter()
            .any(|mount| !mount.node.find_by_class(class).is_empty())
        {
            return true;
        }
        match Selector::parse(&format!(".{}", class)) {
            Ok(selector) => self.document().select(&selector).next().is_some(),
            Err(_) => false,
        }
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Serializes the injected fragments in mount order
    pub fn render_mounts(&self) -> String {
        self.mounts
            .iter()
            .map(|mount| mount.node.to_html())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AddonError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
