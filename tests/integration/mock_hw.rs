//! Mock adapters for integration tests.
//!
//! Records every port call so tests can assert on the full command history
//! without touching real GPIO.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use powerbox::app::events::AppEvent;
use powerbox::app::ports::{ByteSource, EventSink, IndicatorPort, OutputPort, TextReporter};
use powerbox::app::service::{PollOutcome, PowerBox};
use powerbox::channels::ChannelId;
use powerbox::config::BoxConfig;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Output { channel: usize, on: bool },
    Indicator(bool),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_calls(&self) -> Vec<(usize, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Output { channel, on } => Some((*channel, *on)),
                HwCall::Indicator(_) => None,
            })
            .collect()
    }

    pub fn indicator_pulses(&self) -> usize {
        self.calls.iter().filter(|c| **c == HwCall::Indicator(true)).count()
    }
}

impl OutputPort for MockHardware {
    fn set_output(&mut self, channel: ChannelId, on: bool) {
        self.calls.push(HwCall::Output {
            channel: channel.index(),
            on,
        });
    }
}

impl IndicatorPort for MockHardware {
    fn set_indicator(&mut self, on: bool) {
        self.calls.push(HwCall::Indicator(on));
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// One scripted transport event, consumed by a single poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkEvent {
    Byte(u8),
    Timeout,
    Disconnected,
}

#[derive(Default)]
pub struct MockLink {
    pub script: VecDeque<LinkEvent>,
    pub lines: Vec<String>,
    pub reads: usize,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().map(|&b| LinkEvent::Byte(b)));
    }

    pub fn push(&mut self, event: LinkEvent) {
        self.script.push_back(event);
    }
}

impl ByteSource for MockLink {
    fn is_connected(&mut self) -> bool {
        if self.script.front() == Some(&LinkEvent::Disconnected) {
            self.script.pop_front();
            return false;
        }
        true
    }

    fn read_byte(&mut self, _timeout_ms: u32) -> Option<u8> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(LinkEvent::Byte(b)) => Some(b),
            _ => None,
        }
    }
}

impl TextReporter for MockLink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

// ── MockDelay ─────────────────────────────────────────────────

/// Records every millisecond wait instead of sleeping.
#[derive(Default)]
pub struct MockDelay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started service wired to fresh mocks.
pub struct Rig {
    pub app: PowerBox,
    pub hw: MockHardware,
    pub link: MockLink,
    pub delay: MockDelay,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(&BoxConfig::default())
    }

    pub fn with_config(config: &BoxConfig) -> Self {
        let mut app = PowerBox::new(config).expect("valid config");
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::default();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            link: MockLink::new(),
            delay: MockDelay::default(),
            sink,
        }
    }

    /// Forget everything recorded so far (start-up included).
    pub fn clear_records(&mut self) {
        self.hw.calls.clear();
        self.link.lines.clear();
        self.link.reads = 0;
        self.delay.waits_ms.clear();
        self.sink.events.clear();
    }

    pub fn poll(&mut self) -> PollOutcome {
        self.app
            .poll(&mut self.link, &mut self.hw, &mut self.delay, &mut self.sink)
    }

    /// Poll until the scripted input is exhausted; returns every outcome.
    pub fn drain(&mut self) -> Vec<PollOutcome> {
        let mut outcomes = Vec::new();
        while !self.link.script.is_empty() {
            let outcome = self.poll();
            outcomes.push(outcome);
            if matches!(outcome, PollOutcome::Halted(_)) {
                break;
            }
        }
        outcomes
    }

    /// Send `bytes` and poll until they are consumed.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<PollOutcome> {
        self.link.send(bytes);
        self.drain()
    }

    pub fn is_on(&self, channel: u8) -> bool {
        self.app
            .rail_state(ChannelId::new(channel).expect("valid channel"))
            .is_on()
    }
}
