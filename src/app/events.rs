//! Outbound engine events.
//!
//! The [`ChannelService`](super::service::ChannelService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on
//! the other side decide what to do with them — log them, publish them on
//! a message bus, push them to subscribed clients.

/// Structured events emitted by the channel engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// A channel was validated, persisted and indexed.
    ChannelAdded { id: u32, name: String },

    /// A channel was removed from the store and the catalog.
    ChannelDeleted { id: u32, name: String },

    /// A set dispatch completed; carries the stringified remote response.
    ChannelSet {
        id: u32,
        name: String,
        response: String,
    },

    /// A get dispatch completed; carries the float the caller received.
    ChannelGet { id: u32, name: String, value: f64 },

    /// The catalog finished loading from the store.
    CatalogLoaded { loaded: usize, skipped: usize },
}
