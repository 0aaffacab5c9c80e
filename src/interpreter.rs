//! Byte-level command interpreter.
//!
//! A command is exactly two ASCII bytes:
//!
//! ```text
//! command := sign digit
//! sign    := '+' | '-'      ; '+' => ON, '-' => OFF
//! digit   := '0'..'7'       ; rail index
//! ```
//!
//! ```text
//!            '+' / '-'
//!   ┌──────┐ ─────────▶ ┌──────────────┐
//!   │ Idle │            │ SignReceived │
//!   └──────┘ ◀───────── └──────────────┘
//!      ▲     digit → Request
//!      │     other → Error
//!      └──── timeout (from either state)
//! ```
//!
//! There is no framing and no dependency between consecutive commands.
//! A partial command never survives a timeout.

use crate::app::commands::ChannelRequest;
use crate::channels::{ChannelId, RailState};

/// Interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    /// A sign byte arrived; waiting for the channel digit.
    SignReceived(RailState),
}

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// The byte was consumed; no command is complete yet.
    NoResult,
    /// A full command was recognised.
    Request(ChannelRequest),
    /// The byte broke the grammar.  The interpreter is back in `Idle`.
    Error,
}

/// Two-state command parser.
#[derive(Debug, Default)]
pub struct Interpreter {
    state: State,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the state machine by one byte.
    pub fn on_byte(&mut self, byte: u8) -> Interpretation {
        match self.state {
            State::Idle => match sign(byte) {
                Some(desired) => {
                    self.state = State::SignReceived(desired);
                    Interpretation::NoResult
                }
                None => Interpretation::Error,
            },
            State::SignReceived(desired) => {
                self.state = State::Idle;
                match ChannelId::from_digit(byte) {
                    Some(channel) => Interpretation::Request(ChannelRequest::new(channel, desired)),
                    None => Interpretation::Error,
                }
            }
        }
    }

    /// Drop any pending sign.  Returns `true` if a half-received command
    /// was discarded.
    pub fn on_timeout(&mut self) -> bool {
        let discarded = self.state != State::Idle;
        self.state = State::Idle;
        discarded
    }

    pub fn state(&self) -> State {
        self.state
    }
}

fn sign(byte: u8) -> Option<RailState> {
    match byte {
        b'+' => Some(RailState::On),
        b'-' => Some(RailState::Off),
        _ => None,
    }
}
