//! Integration tests for the PowerBox lifecycle: start-up, event flow,
//! configuration, and the fatal latch.

use super::mock_hw::{HwCall, MockHardware, RecordingSink, Rig};

use powerbox::app::events::AppEvent;
use powerbox::app::service::{PollOutcome, PowerBox};
use powerbox::channels::{ChannelId, ExclusionGroup, RailState};
use powerbox::config::{BoxConfig, name};
use powerbox::error::FatalCode;

// ── Start-up ─────────────────────────────────────────────────

#[test]
fn start_drives_every_rail_and_indicator_off() {
    let mut app = PowerBox::new(&BoxConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::default();
    app.start(&mut hw, &mut sink);

    let mut expected: Vec<HwCall> = (0..8)
        .map(|channel| HwCall::Output { channel, on: false })
        .collect();
    expected.push(HwCall::Indicator(false));
    assert_eq!(hw.calls, expected);
    assert_eq!(
        sink.events,
        vec![AppEvent::Started {
            channels: 8,
            groups: 2
        }]
    );
}

// ── Events ───────────────────────────────────────────────────

#[test]
fn shedding_emits_conflict_settle_and_switch_events() {
    let mut rig = Rig::new();
    rig.feed(b"+2");
    rig.clear_records();

    rig.feed(b"+3");

    let ch = |i| ChannelId::new(i).unwrap();
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::ConflictShed {
                channel: ch(2),
                by: ch(3)
            },
            AppEvent::Settled { delay_ms: 100 },
            AppEvent::Switched {
                channel: ch(3),
                state: RailState::On
            },
        ]
    );
}

#[test]
fn malformed_byte_emits_event() {
    let mut rig = Rig::new();
    rig.clear_records();
    rig.feed(b"?");
    assert!(rig.sink.events.contains(&AppEvent::MalformedInput(b'?')));
}

// ── Configuration ────────────────────────────────────────────

#[test]
fn custom_names_and_groups_are_honoured() {
    let mut cfg = BoxConfig::default();
    cfg.channel_names[6] = name("Scope");
    cfg.channel_names[7] = name("Logic");
    cfg.exclusion_groups.clear();
    cfg.exclusion_groups
        .push(ExclusionGroup::new(&[0, 6, 7]))
        .unwrap();
    cfg.settle_delay_ms = 40;

    let mut rig = Rig::with_config(&cfg);
    rig.clear_records();
    rig.feed(b"+0+1+6+7");

    assert_eq!(rig.link.lines, vec!["EMUv4 ON", "EMUv5 ON", "Scope ON", "Logic ON"]);
    assert!(!rig.is_on(0));
    assert!(rig.is_on(1), "default group {{0, 1}} was replaced");
    assert!(!rig.is_on(6));
    assert!(rig.is_on(7));
    assert_eq!(rig.delay.waits_ms, vec![40, 40]);
}

#[test]
fn config_without_groups_never_settles() {
    let mut cfg = BoxConfig::default();
    cfg.exclusion_groups.clear();

    let mut rig = Rig::with_config(&cfg);
    rig.clear_records();
    rig.feed(b"+0+1+2+3");

    assert!(rig.delay.waits_ms.is_empty());
    assert!((0..4).all(|c| rig.is_on(c)));
}

#[test]
fn invalid_config_is_refused() {
    let mut cfg = BoxConfig::default();
    cfg.exclusion_groups.push(ExclusionGroup::new(&[3, 11])).unwrap();
    let err = PowerBox::new(&cfg).err().expect("config must be rejected");
    assert_eq!(err.fatal_code(), FatalCode::InternalConsistency);
}

// ── Fatal latch ──────────────────────────────────────────────

#[test]
fn fatal_prints_marker_and_freezes_processing() {
    let mut rig = Rig::new();
    rig.feed(b"+4");
    rig.clear_records();

    let halt = rig
        .app
        .fatal(FatalCode::TransportInit, &mut rig.link, &mut rig.sink);
    assert_eq!(halt.code(), FatalCode::TransportInit);
    assert_eq!(rig.link.lines, vec!["ERROR #5"]);
    assert_eq!(rig.sink.events, vec![AppEvent::Halted(FatalCode::TransportInit)]);

    rig.link.send(b"-4");
    assert_eq!(rig.poll(), PollOutcome::Halted(halt));
    assert_eq!(rig.poll(), PollOutcome::Halted(halt));

    assert!(rig.hw.calls.is_empty(), "halted service must not drive outputs");
    assert_eq!(rig.link.reads, 0, "halted service must not read the link");
    assert_eq!(rig.link.script.len(), 2);
    assert!(rig.is_on(4), "rail state is frozen, not reset");
    assert_eq!(rig.app.halted(), Some(FatalCode::TransportInit));
}

#[test]
fn second_fatal_keeps_first_code() {
    let mut rig = Rig::new();
    rig.clear_records();

    let first = rig
        .app
        .fatal(FatalCode::InternalConsistency, &mut rig.link, &mut rig.sink);
    let second = rig
        .app
        .fatal(FatalCode::TransportInit, &mut rig.link, &mut rig.sink);

    assert_eq!(first, second);
    assert_eq!(rig.link.lines, vec!["ERROR #6"]);
    assert_eq!(rig.sink.events.len(), 1);
}
