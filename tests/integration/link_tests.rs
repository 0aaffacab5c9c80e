//! Transport behaviour: timeouts and disconnects.

use super::mock_hw::{HwCall, LinkEvent, Rig};

use powerbox::app::events::AppEvent;
use powerbox::app::service::PollOutcome;
use powerbox::controller::Outcome;
use powerbox::interpreter::State;

// ── Timeouts ─────────────────────────────────────────────────

#[test]
fn timeout_discards_pending_sign() {
    let mut rig = Rig::new();
    rig.clear_records();

    rig.link.send(b"+");
    rig.link.push(LinkEvent::Timeout);
    rig.link.send(b"3");
    let outcomes = rig.drain();

    assert_eq!(
        outcomes,
        vec![PollOutcome::Pending, PollOutcome::Timeout, PollOutcome::Rejected]
    );
    assert_eq!(rig.link.lines, vec!["ERR"]);
    assert!(!rig.is_on(3));
    assert!(rig.sink.events.contains(&AppEvent::PartialDiscarded));
}

#[test]
fn fresh_sign_after_timeout_starts_new_command() {
    let mut rig = Rig::new();
    rig.clear_records();

    rig.link.send(b"-");
    rig.link.push(LinkEvent::Timeout);
    rig.link.send(b"+3");
    let outcomes = rig.drain();

    assert_eq!(outcomes.last(), Some(&PollOutcome::Completed(Outcome::Applied)));
    assert_eq!(rig.link.lines, vec!["NSX2 ON"]);
    assert!(rig.is_on(3));
}

#[test]
fn idle_timeout_is_silent() {
    let mut rig = Rig::new();
    rig.clear_records();

    rig.link.push(LinkEvent::Timeout);
    assert_eq!(rig.poll(), PollOutcome::Timeout);

    assert!(rig.link.lines.is_empty());
    assert!(rig.hw.calls.is_empty());
    assert!(rig.delay.waits_ms.is_empty());
    assert!(!rig.sink.events.contains(&AppEvent::PartialDiscarded));
}

// ── Disconnects ──────────────────────────────────────────────

#[test]
fn disconnect_pulses_once_and_pauses() {
    let mut rig = Rig::new();
    rig.clear_records();

    rig.link.push(LinkEvent::Disconnected);
    assert_eq!(rig.poll(), PollOutcome::LinkDown);

    assert_eq!(rig.hw.calls, vec![HwCall::Indicator(true), HwCall::Indicator(false)]);
    assert_eq!(rig.delay.waits_ms, vec![250, 250]);
    assert!(rig.link.lines.is_empty(), "a disconnect produces no protocol line");
    assert_eq!(rig.link.reads, 0, "no read is attempted while disconnected");
    assert_eq!(rig.sink.events, vec![AppEvent::LinkDown]);
}

#[test]
fn disconnect_mid_command_resets_interpreter() {
    let mut rig = Rig::new();
    rig.clear_records();

    rig.link.send(b"+");
    rig.link.push(LinkEvent::Disconnected);
    rig.link.send(b"1");
    let outcomes = rig.drain();

    assert_eq!(
        outcomes,
        vec![PollOutcome::Pending, PollOutcome::LinkDown, PollOutcome::Rejected]
    );
    assert_eq!(rig.app.interpreter_state(), State::Idle);
    assert!(!rig.is_on(1));
}

#[test]
fn link_transitions_are_logged_once() {
    let mut rig = Rig::new();
    rig.clear_records();

    rig.link.push(LinkEvent::Disconnected);
    rig.link.push(LinkEvent::Disconnected);
    rig.link.push(LinkEvent::Timeout);
    rig.link.push(LinkEvent::Timeout);
    rig.drain();

    assert_eq!(rig.sink.events, vec![AppEvent::LinkDown, AppEvent::LinkUp]);
    assert_eq!(rig.hw.indicator_pulses(), 2, "every disconnected poll warns");
}
