//! Output drivers for the rail switches and the status LED.
//!
//! Both are generic over [`embedded_hal::digital::OutputPin`], so the same
//! code drives ESP-IDF `PinDriver`s on the board and [`sim_pin::SimPin`]s
//! on the host.

pub mod power_rail;
pub mod sim_pin;
pub mod status_led;
