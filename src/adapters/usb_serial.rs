//! USB-Serial-JTAG command transport (ESP32-S3 native USB).
//!
//! Installs the ESP-IDF USB-Serial-JTAG driver and exposes it as the
//! command link.  The ESP-IDF console must be routed to UART0
//! (`CONFIG_ESP_CONSOLE_UART_DEFAULT=y`) so log output never interleaves
//! with protocol lines.

use esp_idf_hal::delay::TickType;
use esp_idf_svc::sys::*;
use log::{info, warn};

use crate::app::ports::{ByteSource, TextReporter};
use crate::error::FatalCode;

const RX_BUFFER_SIZE: u32 = 256;
const TX_BUFFER_SIZE: u32 = 256;
/// Longest a report line may block on a stalled host.
const WRITE_TIMEOUT_MS: u64 = 50;

pub struct UsbSerialLink {
    _private: (),
}

impl UsbSerialLink {
    /// Install the driver.  Failure here is unrecoverable.
    pub fn install() -> Result<Self, FatalCode> {
        let mut cfg = usb_serial_jtag_driver_config_t {
            tx_buffer_size: TX_BUFFER_SIZE,
            rx_buffer_size: RX_BUFFER_SIZE,
        };
        // SAFETY: Called once from main() before the polling loop; the
        // config struct outlives the call.
        let ret = unsafe { usb_serial_jtag_driver_install(&mut cfg) };
        if ret != ESP_OK as i32 {
            warn!("usb_serial_jtag_driver_install failed (rc={})", ret);
            return Err(FatalCode::TransportInit);
        }
        info!("usb_serial: driver installed");
        Ok(Self { _private: () })
    }
}

impl ByteSource for UsbSerialLink {
    fn is_connected(&mut self) -> bool {
        // SAFETY: Pure status query on an installed driver.
        unsafe { usb_serial_jtag_is_connected() }
    }

    fn read_byte(&mut self, timeout_ms: u32) -> Option<u8> {
        let mut byte = 0u8;
        let ticks = TickType::new_millis(u64::from(timeout_ms)).ticks();
        // SAFETY: `byte` is a valid 1-byte buffer for the duration of the call.
        let n = unsafe {
            usb_serial_jtag_read_bytes((&raw mut byte).cast(), 1, ticks)
        };
        (n == 1).then_some(byte)
    }
}

impl TextReporter for UsbSerialLink {
    fn write_line(&mut self, line: &str) {
        let ticks = TickType::new_millis(WRITE_TIMEOUT_MS).ticks();
        for chunk in [line.as_bytes(), b"\r\n"] {
            // SAFETY: `chunk` is a valid slice for the duration of the call.
            let n = unsafe {
                usb_serial_jtag_write_bytes(chunk.as_ptr().cast(), chunk.len(), ticks)
            };
            if n < 0 || n as usize != chunk.len() {
                warn!("usb_serial: short write ({} of {} bytes)", n, chunk.len());
                return;
            }
        }
    }
}
