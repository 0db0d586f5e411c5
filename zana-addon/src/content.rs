//! Content script
//!
//! One [`ContentScript`] lives per tab showing a supported retailer. It
//! scrapes the ISBN through the host module, queries every provider in
//! parallel and emits a [`BookDataEvent`] that the host module renders.
//! It refreshes once on load and again whenever the background listener
//! reports a completed product request.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::{AddonError, Result};
use crate::events::{BookDataEvent, EventBus, TabMessage};
use crate::hosts::{HostModule, HostRegistry};
use crate::page::Page;
use crate::provider::{retrieve_book_data, BooksApi};

/// Buffered book data events per listener
const EVENT_CAPACITY: usize = 16;

#[derive(Clone)]
pub struct ContentScript {
    host: Arc<dyn HostModule>,
    api: Arc<dyn BooksApi>,
    bus: EventBus,
    page: Arc<Mutex<Page>>,
    handled: Arc<watch::Sender<usize>>,
}

impl ContentScript {
    pub fn new(host: Arc<dyn HostModule>, api: Arc<dyn BooksApi>, page: Page) -> Self {
        let (handled, _) = watch::channel(0);
        Self {
            host,
            api,
            bus: EventBus::new(EVENT_CAPACITY),
            page: Arc::new(Mutex::new(page)),
            handled: Arc::new(handled),
        }
    }

    /// Content script for `page`, if a host module serves its host
    pub fn for_page(registry: &HostRegistry, api: Arc<dyn BooksApi>, page: Page) -> Result<Self> {
        let host = page.host();
        let module = registry
            .get(&host)
            .ok_or(AddonError::UnsupportedHost(host))?;
        Ok(Self::new(module, api, page))
    }

    pub fn page(&self) -> Arc<Mutex<Page>> {
        Arc::clone(&self.page)
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Counter bumped after the host module handled an event
    pub fn handled_events(&self) -> watch::Receiver<usize> {
        self.handled.subscribe()
    }

    /// Fetches and announces book data if the page shows a book
    pub async fn update(&self) -> Result<Option<BookDataEvent>> {
        if !self.host.query_book_data() {
            return Ok(None);
        }

        let isbn = {
            let page = self.page.lock().await;
            self.host.retrieve_isbn(&page)
        };

        match isbn {
            Some(isbn) if !isbn.is_empty() => self.notify(&isbn).await.map(Some),
            _ => {
                debug!(host = self.host.host(), "No ISBN on page");
                Ok(None)
            }
        }
    }

    /// Shows the loading indicator, queries all providers and emits the event
    pub async fn notify(&self, isbn: &str) -> Result<BookDataEvent> {
        {
            let mut page = self.page.lock().await;
            self.host.loading(&mut page)?;
        }

        let responses = retrieve_book_data(self.api.as_ref(), isbn).await;
        let event = BookDataEvent::new(self.host.event_name(), responses);

        match self.bus.emit(event.clone()) {
            Ok(listeners) => debug!(
                event = %event.name,
                isbn = %isbn,
                listeners = listeners,
                "Book data event emitted"
            ),
            Err(_) => warn!(event = %event.name, "No listener for book data event"),
        }

        Ok(event)
    }

    /// Starts the host module's event listener
    ///
    /// The subscription is taken before spawning, so events emitted after
    /// this returns are never missed.
    pub fn listen(&self) -> JoinHandle<()> {
        let mut events = self.bus.subscribe();
        let host = Arc::clone(&self.host);
        let page = Arc::clone(&self.page);
        let handled = Arc::clone(&self.handled);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if event.name != host.event_name() {
                            continue;
                        }
                        {
                            let mut page = page.lock().await;
                            if let Err(e) = host.handle(&mut page, &event) {
                                error!(event = %event.name, error = %e, "Failed to render book data");
                            }
                        }
                        handled.send_modify(|count| *count += 1);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped = skipped, "Book data listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Runs `update` on load and for every message from the background listener
    pub async fn run(&self, mut messages: mpsc::Receiver<TabMessage>) {
        info!(host = self.host.host(), "Content script started");

        if let Err(e) = self.update().await {
            error!(error = %e, "Initial update failed");
        }

        while messages.recv().await.is_some() {
            if let Err(e) = self.update().await {
                error!(error = %e, "Update failed");
            }
        }

        debug!(host = self.host.host(), "Content script stopped");
    }
}
