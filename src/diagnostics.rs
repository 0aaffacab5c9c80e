//! Diagnostic signalling on the status LED.
//!
//! A code is shown as `code` pulses: on for `pulse_on_ms`, off for
//! `pulse_off_ms` between pulses, no trailing gap, LED left off.
//!
//! * [`Signaler::warn`] pulses once and returns; the loop carries on.
//! * [`Signaler::fatal`] prints `ERROR #<code>` once and latches the code.
//!   The returned [`Halt`] is handed to [`Signaler::halt_forever`], which
//!   repeats the code with a `fatal_cycle_pause_ms` gap until power-cycle.
//!
//! Splitting the latch from the endless loop lets host tests observe a
//! fatal condition without blocking.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{error, warn};

use crate::app::ports::{IndicatorPort, TextReporter};
use crate::config::BoxConfig;
use crate::error::{FatalCode, WarnCode};

/// Proof that a fatal code has latched.  Only obtainable from
/// [`Signaler::fatal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a latched fatal condition must be handed to halt_forever"]
pub struct Halt {
    code: FatalCode,
}

impl Halt {
    pub fn code(self) -> FatalCode {
        self.code
    }
}

/// Pulse-code encoder for warnings and fatal faults.
#[derive(Debug)]
pub struct Signaler {
    pulse_on_ms: u32,
    pulse_off_ms: u32,
    fatal_cycle_pause_ms: u32,
    halted: Option<FatalCode>,
}

impl Signaler {
    pub fn new(config: &BoxConfig) -> Self {
        Self {
            pulse_on_ms: config.pulse_on_ms,
            pulse_off_ms: config.pulse_off_ms,
            fatal_cycle_pause_ms: config.fatal_cycle_pause_ms,
            halted: None,
        }
    }

    /// Blink `count` pulses and leave the indicator off.
    pub fn pulse(&self, count: u8, led: &mut impl IndicatorPort, delay: &mut impl DelayNs) {
        for i in 0..count {
            if i > 0 {
                led.set_indicator(false);
                delay.delay_ms(self.pulse_off_ms);
            }
            led.set_indicator(true);
            delay.delay_ms(self.pulse_on_ms);
        }
        led.set_indicator(false);
    }

    /// Signal a recoverable condition.
    pub fn warn(&self, code: WarnCode, led: &mut impl IndicatorPort, delay: &mut impl DelayNs) {
        warn!("signal: {}", code);
        self.pulse(code.pulses(), led, delay);
    }

    /// Latch a fatal condition and print its marker.
    ///
    /// The first code latched wins; later calls return the existing latch
    /// without printing again.
    pub fn fatal(&mut self, code: FatalCode, reporter: &mut impl TextReporter) -> Halt {
        if let Some(latched) = self.halted {
            return Halt { code: latched };
        }
        error!("FATAL: {}", code);
        let mut line: heapless::String<16> = heapless::String::new();
        let _ = write!(line, "ERROR #{}", code.pulses());
        reporter.write_line(&line);
        self.halted = Some(code);
        Halt { code }
    }

    /// The latched fatal code, if any.
    pub fn halted(&self) -> Option<FatalCode> {
        self.halted
    }

    /// The existing latch as a [`Halt`], without printing anything.
    pub fn latched(&self) -> Option<Halt> {
        self.halted.map(|code| Halt { code })
    }

    /// One repetition of the fatal pattern: the code, then the cycle pause.
    pub fn fatal_cycle(&self, halt: Halt, led: &mut impl IndicatorPort, delay: &mut impl DelayNs) {
        self.pulse(halt.code.pulses(), led, delay);
        delay.delay_ms(self.fatal_cycle_pause_ms);
    }

    /// Blink the latched code forever.  Never returns.
    pub fn halt_forever(
        &self,
        halt: Halt,
        led: &mut impl IndicatorPort,
        delay: &mut impl DelayNs,
    ) -> ! {
        loop {
            self.fatal_cycle(halt, led, delay);
        }
    }
}
