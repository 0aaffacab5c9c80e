//! Power-rail switch driver.
//!
//! One digital output per channel, HIGH = rail energised.  The driver is
//! deliberately dumb: it writes exactly what it is told.  Exclusion rules
//! live in the [`ChannelController`](crate::controller::ChannelController).

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::OutputPort;
use crate::channels::{CHANNEL_COUNT, ChannelId};

pub struct PowerRails<P: OutputPin> {
    pins: [P; CHANNEL_COUNT],
}

impl<P: OutputPin> PowerRails<P> {
    /// Take ownership of the rail pins, indexed by channel.
    pub fn new(pins: [P; CHANNEL_COUNT]) -> Self {
        Self { pins }
    }

    pub fn pin(&self, channel: ChannelId) -> &P {
        &self.pins[channel.index()]
    }
}

impl<P: OutputPin> OutputPort for PowerRails<P> {
    fn set_output(&mut self, channel: ChannelId, on: bool) {
        if let Err(e) = self.pins[channel.index()].set_state(PinState::from(on)) {
            warn!("rail {}: GPIO write failed: {:?}", channel, e);
        }
    }
}
