//! GPIO / peripheral pin assignments for the PowerBox main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

use crate::channels::CHANNEL_COUNT;

// ---------------------------------------------------------------------------
// Power rails (MOSFET high-side switches, active HIGH)
// ---------------------------------------------------------------------------

/// Rail enable outputs, indexed by channel.
///
/// | Channel | Default name | GPIO |
/// |---------|--------------|------|
/// | 0       | EMUv4        | 2    |
/// | 1       | EMUv5        | 3    |
/// | 2       | NSX1         | 4    |
/// | 3       | NSX2         | 5    |
/// | 4       | HiCo         | 6    |
/// | 5–7     | Unused1–3    | 7–9  |
pub const RAIL_GPIOS: [i32; CHANNEL_COUNT] = [2, 3, 4, 5, 6, 7, 8, 9];

// ---------------------------------------------------------------------------
// Status LED (single discrete LED, active HIGH)
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 21;
