//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PowerBox (domain)
//! ```
//!
//! Driven adapters (serial transport, rail outputs, status LED, event
//! sinks) implement these traits.  The [`PowerBox`](super::service::PowerBox)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  Blocking waits go through [`embedded_hal::delay::DelayNs`].

use crate::channels::ChannelId;

// ───────────────────────────────────────────────────────────────
// Command transport (driven adapter: host ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port of the command transport.
pub trait ByteSource {
    /// Whether a host is currently attached.
    fn is_connected(&mut self) -> bool;

    /// Wait at most `timeout_ms` for the next byte.
    ///
    /// Returns `None` on timeout, including when the transport is
    /// momentarily not ready.
    fn read_byte(&mut self, timeout_ms: u32) -> Option<u8>;
}

/// Write-side port of the command transport: one protocol line per call.
pub trait TextReporter {
    /// Emit `line` followed by a line terminator.
    fn write_line(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Drives the physical power rails.
pub trait OutputPort {
    /// Energise (`true`) or de-energise (`false`) a rail.
    fn set_output(&mut self, channel: ChannelId, on: bool);
}

/// Drives the single status indicator.
pub trait IndicatorPort {
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
