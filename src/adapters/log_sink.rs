//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF console on the board, `env_logger` on the
//! host).  Protocol lines never go through here.

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { channels, groups } => {
                info!("START | rails={} groups={} | all rails OFF", channels, groups);
            }
            AppEvent::LinkUp => info!("LINK | host attached"),
            AppEvent::LinkDown => warn!("LINK | no host attached"),
            AppEvent::Switched { channel, state } => {
                info!("RAIL | ch={} -> {}", channel, state);
            }
            AppEvent::Unchanged { channel, state } => {
                debug!("RAIL | ch={} already {}", channel, state);
            }
            AppEvent::ConflictShed { channel, by } => {
                info!("EXCL | ch={} forced OFF by ch={}", channel, by);
            }
            AppEvent::Settled { delay_ms } => debug!("EXCL | settled {} ms", delay_ms),
            AppEvent::MalformedInput(byte) => {
                warn!("PROTO | malformed byte 0x{:02x}", byte);
            }
            AppEvent::PartialDiscarded => debug!("PROTO | partial command dropped on timeout"),
            AppEvent::Halted(code) => error!("HALT | {}", code),
        }
    }
}
