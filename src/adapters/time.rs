//! Host delay adapter.
//!
//! Implements [`DelayNs`] on `std::thread::sleep` for the host
//! simulation.  On the board the binary uses `esp_idf_hal::delay::FreeRtos`
//! instead.

use std::time::Duration;

use embedded_hal::delay::DelayNs;

#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl StdDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
