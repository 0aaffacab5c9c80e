//! PowerBox Firmware: Main Entry Point
//!
//! Hexagonal architecture around a single cooperative polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      UsbSerialLink / StdioLink   LogEventSink │
//! │  (Output+Indicator)   (ByteSource+TextReporter)   (EventSink)  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              PowerBox (pure logic)                     │    │
//! │  │  Interpreter · ChannelController · Signaler            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On the board the command link is the native USB-Serial-JTAG port.  On
//! the host the same loop runs against stdin/stdout with simulated pins;
//! an optional first argument names a JSON configuration file.
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::info;

use powerbox::adapters::hardware::HardwareAdapter;
use powerbox::adapters::log_sink::LogEventSink;
use powerbox::app::ports::TextReporter;
use powerbox::app::service::{PollOutcome, PowerBox};
use powerbox::config::BoxConfig;
use powerbox::controller::force_all_off;
use powerbox::diagnostics::Signaler;
use powerbox::drivers::power_rail::PowerRails;
use powerbox::drivers::status_led::StatusLed;

/// Fallback reporter for markers printed before the command link exists.
struct ConsoleReporter;

impl TextReporter for ConsoleReporter {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

fn banner() {
    info!("╔══════════════════════════════════════╗");
    info!("║  PowerBox v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
}

// ── Main (board) ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
    use powerbox::adapters::usb_serial::UsbSerialLink;
    use powerbox::channels::CHANNEL_COUNT;
    use powerbox::pins;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    banner();

    let config = BoxConfig::default();

    // ── 2. Claim output pins (rails first, so they are driven low early) ──
    let mut rail_drivers = heapless::Vec::<_, CHANNEL_COUNT>::new();
    for gpio in pins::RAIL_GPIOS {
        // SAFETY: every GPIO in RAIL_GPIOS is unique and claimed nowhere else.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        let _ = rail_drivers.push(PinDriver::output(pin)?);
    }
    let rail_drivers = rail_drivers
        .into_array()
        .map_err(|_| anyhow::anyhow!("rail pin table does not cover every channel"))?;
    // SAFETY: STATUS_LED_GPIO is not part of RAIL_GPIOS.
    let led_pin = PinDriver::output(unsafe { AnyOutputPin::new(pins::STATUS_LED_GPIO) })?;

    let mut hw = HardwareAdapter::new(PowerRails::new(rail_drivers), StatusLed::new(led_pin));
    let mut delay = FreeRtos;
    let mut sink = LogEventSink::new();

    // ── 3. Application service ────────────────────────────────
    let mut app = match PowerBox::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("config rejected: {}", e);
            force_all_off(&mut hw);
            let mut signaler = Signaler::new(&config);
            let halt = signaler.fatal(e.fatal_code(), &mut ConsoleReporter);
            signaler.halt_forever(halt, &mut hw, &mut delay);
        }
    };
    app.start(&mut hw, &mut sink);

    // ── 4. Command transport ──────────────────────────────────
    let mut link = match UsbSerialLink::install() {
        Ok(link) => link,
        Err(code) => {
            let halt = app.fatal(code, &mut ConsoleReporter, &mut sink);
            app.signaler().halt_forever(halt, &mut hw, &mut delay);
        }
    };

    info!("System ready. Entering polling loop.");

    // ── 5. Polling loop ───────────────────────────────────────
    loop {
        if let PollOutcome::Halted(halt) = app.poll(&mut link, &mut hw, &mut delay, &mut sink) {
            app.signaler().halt_forever(halt, &mut hw, &mut delay);
        }
    }
}

// ── Main (host simulation) ────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use anyhow::Context;
    use log::warn;
    use powerbox::adapters::stdio::StdioLink;
    use powerbox::adapters::time::StdDelay;
    use powerbox::drivers::sim_pin::SimPin;
    use powerbox::error::FatalCode;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    banner();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let bytes = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
            let cfg: BoxConfig = serde_json::from_slice(&bytes)
                .map_err(|e| anyhow::anyhow!("parsing {path}: {e}"))?;
            info!("Config loaded from {}", path);
            cfg
        }
        None => BoxConfig::default(),
    };

    let mut hw = HardwareAdapter::new(
        PowerRails::new(core::array::from_fn(|_| SimPin::new())),
        StatusLed::new(SimPin::new()),
    );
    let mut delay = StdDelay::new();
    let mut sink = LogEventSink::new();

    let mut app = match PowerBox::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("config rejected: {}", e);
            force_all_off(&mut hw);
            let mut signaler = Signaler::new(&config);
            let halt = signaler.fatal(e.fatal_code(), &mut ConsoleReporter);
            signaler.halt_forever(halt, &mut hw, &mut delay);
        }
    };
    app.start(&mut hw, &mut sink);

    let mut link = match StdioLink::spawn() {
        Ok(link) => link,
        Err(e) => {
            warn!("stdin reader failed to start: {}", e);
            let halt = app.fatal(FatalCode::TransportInit, &mut ConsoleReporter, &mut sink);
            app.signaler().halt_forever(halt, &mut hw, &mut delay);
        }
    };

    info!("Simulation ready. Reading commands from stdin.");

    loop {
        match app.poll(&mut link, &mut hw, &mut delay, &mut sink) {
            PollOutcome::Halted(halt) => app.signaler().halt_forever(halt, &mut hw, &mut delay),
            PollOutcome::LinkDown if link.at_eof() => break,
            _ => {}
        }
    }

    info!(
        "stdin closed after {} applied command(s); rails: {:?}",
        app.commands_applied(),
        app.rail_states()
    );
    Ok(())
}
