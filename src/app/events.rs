//! Outbound application events.
//!
//! The [`PowerBox`](super::service::PowerBox) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  They are diagnostics for
//! the operator log, separate from the protocol lines the host reads.

use crate::channels::{ChannelId, RailState};
use crate::error::FatalCode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service finished its start-up sequence with every rail off.
    Started { channels: usize, groups: usize },

    /// A host attached to the command transport.
    LinkUp,

    /// No host is attached; a warning pulse was emitted.
    LinkDown,

    /// A rail was switched on request.
    Switched { channel: ChannelId, state: RailState },

    /// A request matched the rail's current state; nothing was driven.
    Unchanged { channel: ChannelId, state: RailState },

    /// A rail was forced off because `by` shares an exclusion group with it.
    ConflictShed { channel: ChannelId, by: ChannelId },

    /// The settle delay ran after shedding conflicting rails.
    Settled { delay_ms: u32 },

    /// A byte broke the command grammar.
    MalformedInput(u8),

    /// A read timeout discarded a half-received command.
    PartialDiscarded,

    /// A fatal condition latched; no further commands will be processed.
    Halted(FatalCode),
}
