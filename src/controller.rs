//! Channel controller: authoritative rail state and exclusion enforcement.
//!
//! ## Switching rules
//!
//! 1. A request for the state a rail is already in is a no-op: nothing is
//!    driven, no exclusion group is inspected, no settle delay runs.
//! 2. Switching a rail **on** first sheds every other energised member of
//!    each exclusion group that contains it.  If anything was shed, the
//!    controller waits the settle delay once before continuing, so the
//!    conflicting rails are fully de-energised.
//! 3. Switching a rail **off** never consults exclusion groups.
//!
//! After every successful commit no exclusion group has more than one
//! member on.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{debug, error};

use crate::app::commands::ChannelRequest;
use crate::app::ports::OutputPort;
use crate::channels::{CHANNEL_COUNT, ChannelId, ExclusionGroup, RailState};
use crate::config::{BoxConfig, ChannelName, GROUP_CAPACITY};
use crate::error::FatalCode;

/// Whether a request changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Unchanged,
}

/// Result of one [`ChannelController::apply`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub channel: ChannelId,
    pub name: ChannelName,
    pub state: RailState,
    pub outcome: Outcome,
    /// Rails turned off to honour exclusion groups, in the order they were shed.
    pub shed: heapless::Vec<ChannelId, CHANNEL_COUNT>,
    /// Settle delay that ran, if any rail was shed.
    pub settled_ms: Option<u32>,
}

/// Renders the protocol line: `"<name> <ON|OFF>"`, with a trailing
/// `" (Unchanged)"` for no-ops.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.state)?;
        if self.outcome == Outcome::Unchanged {
            f.write_str(" (Unchanged)")?;
        }
        Ok(())
    }
}

/// Owns the rail states and the exclusion table.
pub struct ChannelController {
    names: [ChannelName; CHANNEL_COUNT],
    groups: heapless::Vec<ExclusionGroup, GROUP_CAPACITY>,
    states: [RailState; CHANNEL_COUNT],
    settle_delay_ms: u32,
}

impl ChannelController {
    /// Build the controller with every rail recorded as off.
    ///
    /// Does **not** drive any output; call [`all_off`](Self::all_off) to
    /// bring the hardware in line.
    pub fn new(config: &BoxConfig) -> Self {
        Self {
            names: config.channel_names.clone(),
            groups: config.exclusion_groups.clone(),
            states: [RailState::Off; CHANNEL_COUNT],
            settle_delay_ms: config.settle_delay_ms,
        }
    }

    /// Drive every rail off and record it.
    pub fn all_off(&mut self, out: &mut impl OutputPort) {
        force_all_off(out);
        self.states = [RailState::Off; CHANNEL_COUNT];
    }

    /// Commit a switch request.
    ///
    /// Returns `Err` only if an exclusion group expands to no members,
    /// which means the exclusion table itself is corrupt.
    pub fn apply(
        &mut self,
        request: ChannelRequest,
        out: &mut impl OutputPort,
        delay: &mut impl DelayNs,
    ) -> Result<Report, FatalCode> {
        let ChannelRequest { channel, state } = request;
        let mut report = Report {
            channel,
            name: self.names[channel.index()].clone(),
            state,
            outcome: Outcome::Unchanged,
            shed: heapless::Vec::new(),
            settled_ms: None,
        };

        if self.states[channel.index()] == state {
            return Ok(report);
        }

        if state.is_on() {
            self.shed_conflicts(channel, out, &mut report.shed)?;
            if !report.shed.is_empty() {
                debug!(
                    "settling {} ms after shedding {} rail(s)",
                    self.settle_delay_ms,
                    report.shed.len()
                );
                delay.delay_ms(self.settle_delay_ms);
                report.settled_ms = Some(self.settle_delay_ms);
            }
        }

        out.set_output(channel, state.is_on());
        self.states[channel.index()] = state;
        report.outcome = Outcome::Applied;
        Ok(report)
    }

    /// Turn off every energised rail that shares a group with `channel`.
    fn shed_conflicts(
        &mut self,
        channel: ChannelId,
        out: &mut impl OutputPort,
        shed: &mut heapless::Vec<ChannelId, CHANNEL_COUNT>,
    ) -> Result<(), FatalCode> {
        for (g, group) in self.groups.iter().enumerate() {
            if group.members().next().is_none() {
                error!("exclusion group {} expands to no members", g);
                return Err(FatalCode::InternalConsistency);
            }
            if !group.contains(channel) {
                continue;
            }
            for member in group.members() {
                if member == channel || !self.states[member.index()].is_on() {
                    continue;
                }
                out.set_output(member, false);
                self.states[member.index()] = RailState::Off;
                // Capacity equals the channel count and each rail is shed at most once.
                let _ = shed.push(member);
            }
        }
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self, channel: ChannelId) -> RailState {
        self.states[channel.index()]
    }

    pub fn name(&self, channel: ChannelId) -> &str {
        &self.names[channel.index()]
    }

    /// Snapshot of every rail state, indexed by channel.
    pub fn states(&self) -> [RailState; CHANNEL_COUNT] {
        self.states
    }

    pub fn groups(&self) -> &[ExclusionGroup] {
        &self.groups
    }
}

/// Drive every rail off without a controller.
///
/// Used when start-up fails before a controller exists.
pub fn force_all_off(out: &mut impl OutputPort) {
    for ch in ChannelId::all() {
        out.set_output(ch, false);
    }
}
