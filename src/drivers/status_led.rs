//! Single-colour status LED driver.
//!
//! The LED only ever carries diagnostic pulse codes, so the driver is a
//! plain on/off output behind [`IndicatorPort`].

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::ports::IndicatorPort;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl<P: OutputPin> IndicatorPort for StatusLed<P> {
    fn set_indicator(&mut self, on: bool) {
        if let Err(e) = self.pin.set_state(PinState::from(on)) {
            warn!("status LED: GPIO write failed: {:?}", e);
        }
        self.on = on;
    }
}
