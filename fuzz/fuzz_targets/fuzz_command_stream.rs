//! Fuzz target: `PowerBox::poll`
//!
//! Drives arbitrary byte sequences through the full service with
//! in-memory ports.  Byte `0x00` is mapped to a read timeout and `0xFF` to
//! a momentary disconnect so both reset paths are exercised.  Asserts that
//! no exclusion group ever has two members on, that every completed
//! command yields exactly one report line, and that the service never
//! halts on client input.
//!
//! cargo fuzz run fuzz_command_stream

#![no_main]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use powerbox::app::events::AppEvent;
use powerbox::app::ports::{ByteSource, EventSink, IndicatorPort, OutputPort, TextReporter};
use powerbox::app::service::{PollOutcome, PowerBox};
use powerbox::channels::ChannelId;
use powerbox::config::BoxConfig;

struct Link {
    input: VecDeque<u8>,
    lines: usize,
}

impl ByteSource for Link {
    fn is_connected(&mut self) -> bool {
        if self.input.front() == Some(&0xFF) {
            self.input.pop_front();
            return false;
        }
        true
    }

    fn read_byte(&mut self, _timeout_ms: u32) -> Option<u8> {
        self.input.pop_front().filter(|&b| b != 0x00)
    }
}

impl TextReporter for Link {
    fn write_line(&mut self, _line: &str) {
        self.lines += 1;
    }
}

struct Null;

impl OutputPort for Null {
    fn set_output(&mut self, _channel: ChannelId, _on: bool) {}
}

impl IndicatorPort for Null {
    fn set_indicator(&mut self, _on: bool) {}
}

impl DelayNs for Null {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = BoxConfig::default();
    let mut app = PowerBox::new(&config).expect("default config is valid");
    let mut link = Link {
        input: data.iter().copied().collect(),
        lines: 0,
    };
    let (mut hw, mut delay, mut sink) = (Null, Null, Null);
    app.start(&mut hw, &mut sink);

    while !link.input.is_empty() {
        let before = link.lines;
        let outcome = app.poll(&mut link, &mut hw, &mut delay, &mut sink);
        match outcome {
            PollOutcome::Completed(_) | PollOutcome::Rejected => {
                assert_eq!(link.lines, before + 1, "one line per command or error");
            }
            PollOutcome::Halted(_) => panic!("client input must never halt the service"),
            _ => assert_eq!(link.lines, before),
        }

        for group in &config.exclusion_groups {
            let on = group.members().filter(|&m| app.rail_state(m).is_on()).count();
            assert!(on <= 1, "exclusion group has {on} rails on");
        }
    }
});
