//! System configuration parameters
//!
//! The channel registry, the exclusion groups, and every protocol timing
//! constant.  Configuration is read once at boot; nothing here changes
//! while the polling loop runs.

use serde::{Deserialize, Serialize};

use crate::channels::{CHANNEL_COUNT, ChannelId, ExclusionGroup};
use crate::error::ConfigError;

/// Maximum length of a channel display name.
pub const NAME_CAPACITY: usize = 16;

/// Maximum number of exclusion groups.
pub const GROUP_CAPACITY: usize = 8;

pub type ChannelName = heapless::String<NAME_CAPACITY>;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    // --- Channels ---
    /// Display name per rail, reported in every status line.
    pub channel_names: [ChannelName; CHANNEL_COUNT],
    /// Sets of rails that must never be energised together.
    pub exclusion_groups: heapless::Vec<ExclusionGroup, GROUP_CAPACITY>,

    // --- Timing ---
    /// Maximum time a single byte read blocks (milliseconds)
    pub poll_interval_ms: u32,
    /// Pause between de-energising conflicting rails and energising a new one
    pub settle_delay_ms: u32,
    /// Indicator on-time per pulse (milliseconds)
    pub pulse_on_ms: u32,
    /// Indicator off-time between pulses (milliseconds)
    pub pulse_off_ms: u32,
    /// Pause between repetitions of a fatal pulse code (milliseconds)
    pub fatal_cycle_pause_ms: u32,
    /// Pause after the link-down warning before polling again (milliseconds)
    pub link_down_pause_ms: u32,
}

impl Default for BoxConfig {
    fn default() -> Self {
        let mut exclusion_groups = heapless::Vec::new();
        // Both emulator revisions share one supply, as do both NSX boards.
        let _ = exclusion_groups.push(ExclusionGroup::new(&[0, 1]));
        let _ = exclusion_groups.push(ExclusionGroup::new(&[2, 3]));

        Self {
            channel_names: [
                name("EMUv4"),
                name("EMUv5"),
                name("NSX1"),
                name("NSX2"),
                name("HiCo"),
                name("Unused1"),
                name("Unused2"),
                name("Unused3"),
            ],
            exclusion_groups,

            poll_interval_ms: 10,
            settle_delay_ms: 100,
            pulse_on_ms: 250,
            pulse_off_ms: 250,
            fatal_cycle_pause_ms: 2000,
            link_down_pause_ms: 250,
        }
    }
}

impl BoxConfig {
    /// Check the registry and timings for values the controller cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, n) in self.channel_names.iter().enumerate() {
            if n.trim().is_empty() {
                return Err(ConfigError::EmptyChannelName(idx as u8));
            }
        }

        for (g, group) in self.exclusion_groups.iter().enumerate() {
            let raw = group.raw_members();
            if raw.is_empty() {
                return Err(ConfigError::EmptyGroup(g));
            }
            if let Some(&member) = raw.iter().find(|&&m| ChannelId::new(m).is_none()) {
                return Err(ConfigError::MemberOutOfRange { group: g, member });
            }
            // Deserialised groups bypass the dedup in `ExclusionGroup::new`.
            let distinct = raw
                .iter()
                .enumerate()
                .filter(|&(i, m)| !raw[..i].contains(m))
                .count();
            if distinct == 1 {
                return Err(ConfigError::TrivialGroup(g));
            }
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroTiming("poll_interval_ms"));
        }
        if self.pulse_on_ms == 0 {
            return Err(ConfigError::ZeroTiming("pulse_on_ms"));
        }
        Ok(())
    }

    /// Display name of a channel.
    pub fn channel_name(&self, channel: ChannelId) -> &str {
        &self.channel_names[channel.index()]
    }
}

/// Build a channel name, truncating to [`NAME_CAPACITY`] bytes on a char boundary.
pub fn name(s: &str) -> ChannelName {
    let mut out = ChannelName::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
