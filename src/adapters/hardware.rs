//! Hardware adapter: bridges the output drivers to domain port traits.
//!
//! Owns the rail switches and the status LED, exposing them through
//! [`OutputPort`] and [`IndicatorPort`].  The service takes both through a
//! single `&mut`, which this type satisfies.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{IndicatorPort, OutputPort};
use crate::channels::ChannelId;
use crate::drivers::power_rail::PowerRails;
use crate::drivers::status_led::StatusLed;

/// Concrete adapter that combines all outputs behind port traits.
pub struct HardwareAdapter<R: OutputPin, L: OutputPin> {
    rails: PowerRails<R>,
    led: StatusLed<L>,
}

impl<R: OutputPin, L: OutputPin> HardwareAdapter<R, L> {
    pub fn new(rails: PowerRails<R>, led: StatusLed<L>) -> Self {
        Self { rails, led }
    }

    pub fn rails(&self) -> &PowerRails<R> {
        &self.rails
    }

    pub fn led(&self) -> &StatusLed<L> {
        &self.led
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<R: OutputPin, L: OutputPin> OutputPort for HardwareAdapter<R, L> {
    fn set_output(&mut self, channel: ChannelId, on: bool) {
        self.rails.set_output(channel, on);
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<R: OutputPin, L: OutputPin> IndicatorPort for HardwareAdapter<R, L> {
    fn set_indicator(&mut self, on: bool) {
        self.led.set_indicator(on);
    }
}
