//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements                  | Connects to              |
//! |--------------|-----------------------------|--------------------------|
//! | `hardware`   | OutputPort, IndicatorPort   | Rail switches, status LED|
//! | `log_sink`   | EventSink                   | `log` facade             |
//! | `stdio`      | ByteSource, TextReporter    | Host stdin / stdout      |
//! | `time`       | DelayNs                     | Host thread sleep        |
//! | `usb_serial` | ByteSource, TextReporter    | ESP32 USB-Serial-JTAG    |

pub mod hardware;
pub mod log_sink;
#[cfg(not(target_os = "espidf"))]
pub mod stdio;
#[cfg(not(target_os = "espidf"))]
pub mod time;
#[cfg(target_os = "espidf")]
pub mod usb_serial;
