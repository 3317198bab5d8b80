//! Integration tests for the idle-time remote link: token rotation and
//! command ingestion through the remote store.

use garagedoor::app::events::AppEvent;
use garagedoor::app::service::Step;
use garagedoor::error::{CommandError, RemoteError};
use garagedoor::events::Event;
use garagedoor::remote::{Rejection, RemoteIntent, RemoteKey};
use garagedoor::shared::DoorStatus;

use super::mock_hw::{MockRemote, Rig};

/// Started rig with the startup refresh drained and token `47` published
/// at t = 1 ms.
fn rig_with_token() -> Rig {
    let mut rig = Rig::new(&[1247, 1203]);
    rig.drain();
    assert_eq!(rig.step(1), Ok(Step::Idle { tasks_run: 1 }));
    assert_eq!(rig.svc.token(), Some(47));
    rig
}

#[test]
fn first_idle_pass_publishes_token() {
    let rig = rig_with_token();
    assert_eq!(rig.remote.value(RemoteKey::Token), "47");
    assert!(rig.sink.contains(&AppEvent::TokenIssued(47)));
}

#[test]
fn token_rotates_after_period() {
    let mut rig = rig_with_token();

    assert_eq!(rig.step(30_001), Ok(Step::Idle { tasks_run: 1 })); // command poll only
    assert_eq!(rig.svc.token(), Some(47));

    rig.step(30_002).unwrap();
    assert_eq!(rig.svc.token(), Some(3));
    assert_eq!(rig.remote.history(RemoteKey::Token), vec!["", "47", "3"]);
}

#[test]
fn valid_open_command_opens_door() {
    let mut rig = rig_with_token();
    rig.remote.app_writes(RemoteKey::Command, "2z47");

    assert_eq!(rig.step(15_001), Ok(Step::Idle { tasks_run: 1 }));
    assert!(rig.sink.contains(&AppEvent::CommandAccepted(RemoteIntent::Open)));
    assert_eq!(rig.queue.peek_front(), Ok(Event::DoorOpen));

    rig.drain();
    assert_eq!(rig.svc.door_status(), DoorStatus::Opened);
    assert_eq!(rig.remote.value(RemoteKey::DoorStatus), "0");
}

#[test]
fn spent_token_is_replaced_and_replay_rejected() {
    let mut rig = rig_with_token();
    rig.remote.app_writes(RemoteKey::Command, "2z47");
    rig.step(15_001).unwrap();
    rig.drain();

    // The spent token forces a rotation on the next idle pass.
    assert!(rig.svc.token().is_none());
    rig.step(15_002).unwrap();
    assert_eq!(rig.svc.token(), Some(3));

    // The app never cleared its command; the next poll sees it again.
    rig.step(30_002).unwrap();
    assert!(rig.sink.contains(&AppEvent::CommandRejected(Rejection::StaleToken {
        expected: 3,
        got: 47,
    })));
    assert!(rig.queue.is_empty());
    assert_eq!(rig.svc.link().accepted(), 1);
}

#[test]
fn stale_token_is_rejected() {
    let mut rig = rig_with_token();
    rig.remote.app_writes(RemoteKey::Command, "4z12");

    rig.step(15_001).unwrap();
    assert!(rig.sink.contains(&AppEvent::CommandRejected(Rejection::StaleToken {
        expected: 47,
        got: 12,
    })));
    assert!(rig.queue.is_empty());
    assert_eq!(rig.svc.token(), Some(47));
}

#[test]
fn halt_command_is_queued_at_front() {
    let mut rig = rig_with_token();
    rig.queue.push_back(Event::ShowDialValue).unwrap();
    // Nothing is polled while work is pending.
    rig.remote.app_writes(RemoteKey::Command, "6z47");
    assert_eq!(rig.step(15_001), Ok(Step::Dispatched(Event::ShowDialValue)));

    rig.step(15_002).unwrap();
    assert_eq!(rig.queue.peek_front(), Ok(Event::DoorHalt));

    rig.drain();
    assert!(rig.sink.contains(&AppEvent::Halted { purged: 0 }));
    assert_eq!(rig.svc.door_status(), DoorStatus::Closed);
}

#[test]
fn blank_command_is_ignored_silently() {
    let mut rig = rig_with_token();
    rig.remote.app_writes(RemoteKey::Command, " ");
    let before = rig.sink.events.len();

    rig.step(15_001).unwrap();
    assert_eq!(rig.sink.events.len(), before);
    assert!(rig.queue.is_empty());
}

#[test]
fn malformed_commands_are_reported() {
    let mut rig = rig_with_token();
    rig.remote.app_writes(RemoteKey::Command, "open please");
    rig.step(15_001).unwrap();
    assert!(rig.sink.contains(&AppEvent::CommandMalformed(CommandError::MissingDelimiter)));
    // A malformed payload does not spend the token.
    assert_eq!(rig.svc.token(), Some(47));

    rig.remote.app_writes(RemoteKey::Command, "9z47");
    rig.step(30_002).unwrap();
    assert!(rig.sink.contains(&AppEvent::CommandMalformed(CommandError::UnknownEvent(9))));
    assert!(rig.queue.is_empty());
    assert_eq!(rig.svc.link().rejected(), 0);
}

#[test]
fn remote_outage_is_reported_and_door_still_works() {
    let mut remote = MockRemote::new();
    remote.available = false;
    let mut rig = Rig::with_remote(&[1247], remote);

    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::RemoteUnavailable { .. })),
        3
    );

    rig.drain();
    rig.step(1).unwrap();
    assert!(rig.sink.contains(&AppEvent::RemoteUnavailable {
        key: RemoteKey::Token,
        error: RemoteError::Unavailable,
    }));
    assert!(rig.sink.contains(&AppEvent::TokenIssued(47)));

    rig.step(15_001).unwrap();
    assert!(rig.sink.contains(&AppEvent::RemoteUnavailable {
        key: RemoteKey::Command,
        error: RemoteError::Unavailable,
    }));

    rig.inputs.on_touch();
    rig.drain();
    assert_eq!(rig.svc.door_status(), DoorStatus::Opened);
    assert_eq!(rig.hw.positions().len(), 5);
}
