//! Unified error and diagnostic-code types for the PowerBox firmware.
//!
//! Two tiers exist:
//!
//! * **Recoverable** conditions never surface as errors at all; the
//!   command interpreter resets and the loop carries on.  They are
//!   signalled with a [`WarnCode`] pulse or the `ERR` protocol line.
//! * **Fatal** conditions carry a [`FatalCode`].  Once raised the firmware
//!   stops processing commands and blinks the code until power-cycled.
//!
//! All types are `Copy` so they can be passed around the polling loop
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible start-up operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed validation.
    Config(ConfigError),
    /// A condition that halts the firmware permanently.
    Fatal(FatalCode),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Fatal(code) => write!(f, "fatal: {code}"),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// The pulse code the firmware halts with for this error.
    ///
    /// A configuration that fails validation describes channels and
    /// exclusion groups the controller cannot honour, so it is reported as
    /// an internal-consistency fault.
    pub const fn fatal_code(self) -> FatalCode {
        match self {
            Self::Config(_) => FatalCode::InternalConsistency,
            Self::Fatal(code) => code,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A channel has an empty display name.
    EmptyChannelName(u8),
    /// An exclusion group has no members.
    EmptyGroup(usize),
    /// An exclusion group has a single member and therefore excludes nothing.
    TrivialGroup(usize),
    /// An exclusion group references a channel index outside the registry.
    MemberOutOfRange { group: usize, member: u8 },
    /// A timing parameter is zero where zero is meaningless.
    ZeroTiming(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChannelName(ch) => write!(f, "channel {ch} has an empty name"),
            Self::EmptyGroup(g) => write!(f, "exclusion group {g} is empty"),
            Self::TrivialGroup(g) => write!(f, "exclusion group {g} has a single member"),
            Self::MemberOutOfRange { group, member } => {
                write!(f, "exclusion group {group} references channel {member}")
            }
            Self::ZeroTiming(field) => write!(f, "{field} must be non-zero"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Pulse codes
// ---------------------------------------------------------------------------

/// Unrecoverable conditions.  The discriminant is the number of pulses the
/// status LED emits per cycle, and is stable across firmware revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FatalCode {
    /// The command transport could not be brought up at boot.
    TransportInit = 5,
    /// The channel/exclusion-group tables are inconsistent (e.g. a group
    /// expanded to no members).
    InternalConsistency = 6,
}

impl FatalCode {
    /// Pulse count for this code.
    pub const fn pulses(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FatalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportInit => write!(f, "transport init failed (#{})", self.pulses()),
            Self::InternalConsistency => {
                write!(f, "internal consistency violation (#{})", self.pulses())
            }
        }
    }
}

impl From<FatalCode> for Error {
    fn from(code: FatalCode) -> Self {
        Self::Fatal(code)
    }
}

/// Recoverable conditions signalled by a one-shot pulse burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WarnCode {
    /// No host is attached to the command transport.
    LinkDown = 1,
}

impl WarnCode {
    /// Pulse count for this code.
    pub const fn pulses(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WarnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkDown => write!(f, "link down (#{})", self.pulses()),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
