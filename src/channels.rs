//! Channel identity, rail state, and mutual-exclusion groups.
//!
//! The channel set is fixed at [`CHANNEL_COUNT`] and never changes while
//! the firmware runs.  Exclusion groups are plain sets of channel indices;
//! membership is all the controller ever asks of them.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of switched power rails on the board.
pub const CHANNEL_COUNT: usize = 8;

// ---------------------------------------------------------------------------
// Channel identity
// ---------------------------------------------------------------------------

/// Index of a power rail, guaranteed to be in `0..CHANNEL_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(u8);

impl ChannelId {
    /// Construct from a raw index.  Returns `None` when out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CHANNEL_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Decode an ASCII channel digit (`'0'..='7'`).
    pub const fn from_digit(byte: u8) -> Option<Self> {
        match byte {
            b'0'..=b'9' => Self::new(byte - b'0'),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every channel, in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CHANNEL_COUNT as u8).map(Self)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rail state
// ---------------------------------------------------------------------------

/// On/off state of a single rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RailState {
    #[default]
    Off,
    On,
}

impl RailState {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Protocol spelling used in report lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl From<bool> for RailState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for RailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Exclusion groups
// ---------------------------------------------------------------------------

/// A set of channels that must never be on at the same time.
///
/// Members are stored as raw indices so that a group can be deserialised
/// from configuration before validation; [`members`](Self::members) only
/// yields indices that resolve to real channels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExclusionGroup {
    members: heapless::Vec<u8, CHANNEL_COUNT>,
}

impl ExclusionGroup {
    /// Build a group from raw indices.  Duplicates are dropped; indices
    /// beyond the capacity of the group are ignored.
    pub fn new(indices: &[u8]) -> Self {
        let mut members = heapless::Vec::new();
        for &idx in indices {
            if !members.contains(&idx) {
                let _ = members.push(idx);
            }
        }
        Self { members }
    }

    /// Raw member indices as declared.
    pub fn raw_members(&self) -> &[u8] {
        &self.members
    }

    /// Members that resolve to valid channels.
    pub fn members(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.members.iter().filter_map(|&idx| ChannelId::new(idx))
    }

    pub fn contains(&self, channel: ChannelId) -> bool {
        self.members().any(|m| m == channel)
    }
}
