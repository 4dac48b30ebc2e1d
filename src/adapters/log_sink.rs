//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured channel events to the
//! logger. A message-bus adapter would implement the same trait to push
//! the events to subscribed clients instead.

use log::info;

use crate::app::events::ChannelEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ChannelEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ChannelEvent) {
        match event {
            ChannelEvent::ChannelAdded { id, name } => {
                info!("EVENT | channel added | {id} ({name})");
            }
            ChannelEvent::ChannelDeleted { id, name } => {
                info!("EVENT | channel deleted | {id} ({name})");
            }
            ChannelEvent::ChannelSet { id, name, response } => {
                info!("EVENT | channel set | {id} ({name}) -> {response}");
            }
            ChannelEvent::ChannelGet { id, name, value } => {
                info!("EVENT | channel get | {id} ({name}) -> {value}");
            }
            ChannelEvent::CatalogLoaded { loaded, skipped } => {
                info!("EVENT | catalog loaded | {loaded} channels, {skipped} skipped");
            }
        }
    }
}
