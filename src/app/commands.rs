//! Inbound commands to the application service.
//!
//! The command interpreter turns the raw byte stream into these; the
//! [`PowerBox`](super::service::PowerBox) hands them to the channel
//! controller.

use crate::channels::{ChannelId, RailState};

/// A fully decoded switch request: drive `channel` to `state`.
///
/// Only lives for the duration of one recognised command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRequest {
    pub channel: ChannelId,
    pub state: RailState,
}

impl ChannelRequest {
    pub const fn new(channel: ChannelId, state: RailState) -> Self {
        Self { channel, state }
    }
}
