//! Messages and custom events exchanged inside the add-on
//!
//! The background listener pokes content scripts with [`TabMessage`]s; the
//! content script announces fetched book data to the host module through a
//! broadcast [`EventBus`] of [`BookDataEvent`]s, standing in for the page's
//! `CustomEvent` dispatch.

use tokio::sync::broadcast;

use crate::provider::ProviderResponse;

/// Empty message sent from the background listener to a tab's content script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabMessage;

/// Custom event carrying provider responses in query order
#[derive(Debug, Clone)]
pub struct BookDataEvent {
    /// Event name chosen by the host module
    pub name: String,
    pub responses: Vec<ProviderResponse>,
}

impl BookDataEvent {
    pub fn new(name: &str, responses: Vec<ProviderResponse>) -> Self {
        Self {
            name: name.to_string(),
            responses,
        }
    }
}

/// Broadcast bus for book data events
///
/// Subscribers only receive events emitted after they subscribed.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BookDataEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per lagging subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookDataEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of receivers, or `Err` when nobody is listening.
    pub fn emit(
        &self,
        event: BookDataEvent,
    ) -> Result<usize, broadcast::error::SendError<BookDataEvent>> {
        self.tx.send(event)
    }
}
