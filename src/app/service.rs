//! Application service: the hexagonal core.
//!
//! [`PowerBox`] owns the command interpreter, the channel controller, and
//! the diagnostic signaler.  It exposes one loop iteration as
//! [`PowerBox::poll`]; the binary calls it forever.  All I/O flows through
//! port traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  ByteSource ──▶ ┌──────────────────────────────┐ ──▶ TextReporter
//!                 │           PowerBox            │
//!  OutputPort ◀── │ Interpreter · Controller ·    │ ──▶ EventSink
//! IndicatorPort ◀─│ Signaler                      │
//!                 └──────────────────────────────┘
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::channels::{CHANNEL_COUNT, ChannelId, RailState};
use crate::config::BoxConfig;
use crate::controller::{ChannelController, Outcome, Report};
use crate::diagnostics::{Halt, Signaler};
use crate::error::{Error, FatalCode, WarnCode};
use crate::interpreter::{self, Interpretation, Interpreter};

use super::commands::ChannelRequest;
use super::events::AppEvent;
use super::ports::{ByteSource, EventSink, IndicatorPort, OutputPort, TextReporter};

/// Protocol line for a byte that broke the grammar.
pub const ERR_LINE: &str = "ERR";

/// What one [`PowerBox::poll`] iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No host attached: warned, paused, interpreter reset.
    LinkDown,
    /// No byte arrived within the poll window; interpreter reset.
    Timeout,
    /// A byte was consumed and a command is half-received.
    Pending,
    /// A command completed and its report line was written.
    Completed(Outcome),
    /// A byte broke the grammar; `ERR` was written.
    Rejected,
    /// A fatal condition is latched.  Hand the token to
    /// [`Signaler::halt_forever`].
    Halted(Halt),
}

// ───────────────────────────────────────────────────────────────
// PowerBox
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct PowerBox {
    interpreter: Interpreter,
    controller: ChannelController,
    signaler: Signaler,
    poll_interval_ms: u32,
    link_down_pause_ms: u32,
    /// Last observed link state; `None` until the first poll.
    link_up: Option<bool>,
    commands_applied: u64,
}

impl PowerBox {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &BoxConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            interpreter: Interpreter::new(),
            controller: ChannelController::new(config),
            signaler: Signaler::new(config),
            poll_interval_ms: config.poll_interval_ms,
            link_down_pause_ms: config.link_down_pause_ms,
            link_up: None,
            commands_applied: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every rail and the indicator off.
    pub fn start(&mut self, hw: &mut (impl OutputPort + IndicatorPort), sink: &mut impl EventSink) {
        self.controller.all_off(hw);
        hw.set_indicator(false);
        sink.emit(&AppEvent::Started {
            channels: CHANNEL_COUNT,
            groups: self.controller.groups().len(),
        });
        info!(
            "PowerBox started: {} rails, {} exclusion group(s)",
            CHANNEL_COUNT,
            self.controller.groups().len()
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one loop iteration: link check → byte read → interpret → apply.
    ///
    /// The `link` parameter satisfies **both** [`ByteSource`] and
    /// [`TextReporter`]; the command transport is one bidirectional pipe.
    pub fn poll(
        &mut self,
        link: &mut (impl ByteSource + TextReporter),
        hw: &mut (impl OutputPort + IndicatorPort),
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> PollOutcome {
        if let Some(halt) = self.signaler.latched() {
            return PollOutcome::Halted(halt);
        }

        if !link.is_connected() {
            if self.link_up != Some(false) {
                sink.emit(&AppEvent::LinkDown);
            }
            self.link_up = Some(false);
            self.signaler.warn(WarnCode::LinkDown, hw, delay);
            delay.delay_ms(self.link_down_pause_ms);
            self.interpreter.on_timeout();
            return PollOutcome::LinkDown;
        }
        if self.link_up != Some(true) {
            sink.emit(&AppEvent::LinkUp);
        }
        self.link_up = Some(true);

        let Some(byte) = link.read_byte(self.poll_interval_ms) else {
            if self.interpreter.on_timeout() {
                sink.emit(&AppEvent::PartialDiscarded);
            }
            return PollOutcome::Timeout;
        };

        match self.interpreter.on_byte(byte) {
            Interpretation::NoResult => PollOutcome::Pending,
            Interpretation::Error => {
                debug!("rejected byte 0x{:02x}", byte);
                link.write_line(ERR_LINE);
                sink.emit(&AppEvent::MalformedInput(byte));
                PollOutcome::Rejected
            }
            Interpretation::Request(req) => self.handle_request(req, link, hw, delay, sink),
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a decoded request and write its report line.
    pub fn handle_request(
        &mut self,
        req: ChannelRequest,
        reporter: &mut impl TextReporter,
        out: &mut impl OutputPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> PollOutcome {
        if let Some(halt) = self.signaler.latched() {
            return PollOutcome::Halted(halt);
        }
        match self.controller.apply(req, out, delay) {
            Ok(report) => {
                self.report(&report, reporter, sink);
                PollOutcome::Completed(report.outcome)
            }
            Err(code) => PollOutcome::Halted(self.fatal(code, reporter, sink)),
        }
    }

    /// Latch a fatal condition.  Every later poll returns
    /// [`PollOutcome::Halted`] without touching any port.
    pub fn fatal(
        &mut self,
        code: FatalCode,
        reporter: &mut impl TextReporter,
        sink: &mut impl EventSink,
    ) -> Halt {
        let first = self.signaler.halted().is_none();
        let halt = self.signaler.fatal(code, reporter);
        if first {
            sink.emit(&AppEvent::Halted(halt.code()));
        }
        halt
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn rail_state(&self, channel: ChannelId) -> RailState {
        self.controller.state(channel)
    }

    /// Snapshot of every rail state, indexed by channel.
    pub fn rail_states(&self) -> [RailState; CHANNEL_COUNT] {
        self.controller.states()
    }

    pub fn interpreter_state(&self) -> interpreter::State {
        self.interpreter.state()
    }

    pub fn halted(&self) -> Option<FatalCode> {
        self.signaler.halted()
    }

    /// Borrow the signaler, e.g. to run [`Signaler::halt_forever`].
    pub fn signaler(&self) -> &Signaler {
        &self.signaler
    }

    /// Requests that changed a rail since start.
    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    // ── Internal ──────────────────────────────────────────────

    fn report(&mut self, report: &Report, reporter: &mut impl TextReporter, sink: &mut impl EventSink) {
        for &shed in &report.shed {
            sink.emit(&AppEvent::ConflictShed {
                channel: shed,
                by: report.channel,
            });
        }
        if let Some(delay_ms) = report.settled_ms {
            sink.emit(&AppEvent::Settled { delay_ms });
        }
        match report.outcome {
            Outcome::Applied => {
                self.commands_applied += 1;
                sink.emit(&AppEvent::Switched {
                    channel: report.channel,
                    state: report.state,
                });
            }
            Outcome::Unchanged => sink.emit(&AppEvent::Unchanged {
                channel: report.channel,
                state: report.state,
            }),
        }

        let mut line: heapless::String<40> = heapless::String::new();
        let _ = write!(line, "{report}");
        reporter.write_line(&line);
    }
}
