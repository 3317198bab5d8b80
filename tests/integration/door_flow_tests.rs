//! Integration tests for the touch → DoorService → servo/display/remote
//! pipeline.
//!
//! Edges are injected through an `InputBridge` exactly as the GPIO ISRs
//! would, then the service is stepped until the queue drains.

use garagedoor::app::events::AppEvent;
use garagedoor::error::{Error, QueueError};
use garagedoor::events::{EVENT_QUEUE_CAP, Event};
use garagedoor::remote::RemoteKey;
use garagedoor::shared::{DialMode, DoorStatus};

use super::mock_hw::Rig;

fn screen(l0: &str, l1: &str) -> Option<(String, String)> {
    Some((l0.to_string(), l1.to_string()))
}

#[test]
fn startup_publishes_state_and_shows_door_status() {
    let mut rig = Rig::new(&[]);

    assert_eq!(
        rig.remote.puts,
        vec![
            (RemoteKey::Token, String::new()),
            (RemoteKey::DoorStatus, "1".to_string()),
            (RemoteKey::DialValue, "5".to_string()),
        ]
    );
    assert_eq!(
        rig.sink.events.first(),
        Some(&AppEvent::Started {
            status: DoorStatus::Closed,
            dial_value: 5
        })
    );

    assert_eq!(rig.drain(), 1);
    assert_eq!(rig.hw.last_screen(), screen("  Door  ", " Closed "));
    assert!(rig.hw.positions().is_empty());
}

#[test]
fn touch_opens_door_fully() {
    let mut rig = Rig::new(&[]);
    rig.drain();

    assert_eq!(rig.inputs.on_touch(), Some(Event::DoorOpen));
    rig.drain();

    assert_eq!(rig.hw.positions(), vec![36, 72, 108, 144, 180]);
    assert_eq!(rig.hw.settled_ms(), 5 * 1000);
    assert_eq!(rig.svc.door_status(), DoorStatus::Opened);
    assert_eq!(rig.svc.dial_value(), 0);
    assert_eq!(rig.hw.last_screen(), screen("  Door  ", " Opened "));
    assert_eq!(rig.remote.history(RemoteKey::DoorStatus), vec!["1", "2", "0"]);
    assert_eq!(rig.remote.value(RemoteKey::DialValue), "0");
    assert!(rig.sink.contains(&AppEvent::DoorStatusChanged {
        from: DoorStatus::Opening,
        to: DoorStatus::Opened,
    }));
}

#[test]
fn display_shows_opening_while_moving() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_touch();

    // DoorOpen, then the burst's ShowDoorStatus.
    rig.step(0).unwrap();
    rig.step(0).unwrap();
    assert_eq!(rig.hw.last_screen(), screen("  Door  ", "Opening "));
}

#[test]
fn open_then_close_returns_servo_home() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_touch();
    rig.drain();

    assert_eq!(rig.inputs.on_touch(), Some(Event::DoorClose));
    rig.drain();

    assert_eq!(
        rig.hw.positions(),
        vec![36, 72, 108, 144, 180, 144, 108, 72, 36, 0]
    );
    assert_eq!(rig.svc.door_status(), DoorStatus::Closed);
    assert_eq!(rig.svc.dial_value(), 5);
    assert_eq!(rig.remote.value(RemoteKey::DoorStatus), "1");
    assert_eq!(rig.remote.value(RemoteKey::DialValue), "5");
}

#[test]
fn touch_while_opening_halts_remaining_burst() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_touch();

    // DoorOpen, ShowDoorStatus, SyncDoorStatus, two steps.
    for _ in 0..5 {
        rig.step(0).unwrap();
    }
    assert_eq!(rig.svc.servo_angle(), 72);

    assert_eq!(rig.inputs.on_touch(), Some(Event::DoorHalt));
    assert_eq!(rig.queue.peek_front(), Ok(Event::DoorHalt));
    rig.drain();

    assert!(rig.sink.contains(&AppEvent::Halted { purged: 4 }));
    assert_eq!(rig.hw.positions(), vec![36, 72]);
    assert_eq!(rig.svc.door_status(), DoorStatus::Opening);
    assert_eq!(rig.svc.dial_value(), 3);
    assert_eq!(rig.remote.value(RemoteKey::DoorStatus), "2");
    assert_eq!(rig.remote.value(RemoteKey::DialValue), "3");
}

#[test]
fn touch_before_first_step_does_not_stop_the_door() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_touch();

    // Only DoorOpen has run; the display and sync events still lead the burst.
    rig.step(0).unwrap();
    assert_eq!(rig.inputs.on_touch(), Some(Event::DoorHalt));
    rig.drain();

    assert!(rig.sink.contains(&AppEvent::Halted { purged: 0 }));
    assert_eq!(rig.svc.door_status(), DoorStatus::Opened);
    assert_eq!(rig.hw.positions(), vec![36, 72, 108, 144, 180]);
}

#[test]
fn open_after_halt_finishes_remaining_travel() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_touch();
    for _ in 0..5 {
        rig.step(0).unwrap();
    }
    rig.inputs.on_touch();
    rig.drain();

    rig.queue.push_back(Event::DoorOpen).unwrap();
    rig.drain();

    assert_eq!(rig.hw.positions(), vec![36, 72, 108, 144, 180]);
    assert_eq!(rig.svc.door_status(), DoorStatus::Opened);
}

#[test]
fn dial_adjust_moves_door_one_step() {
    let mut rig = Rig::new(&[]);
    rig.drain();

    assert_eq!(rig.inputs.on_dial_button(), Some(Event::DialEnterAdjust));
    rig.drain();
    assert_eq!(rig.shared.dial_mode(), DialMode::Adjusting);
    assert_eq!(rig.hw.last_screen(), screen("DoorOpen", "  100 % "));

    assert_eq!(rig.inputs.on_dial_rotation(5_000, false), Some(Event::DialDecrement));
    rig.drain();
    assert_eq!(rig.hw.positions(), vec![36]);
    assert_eq!(rig.hw.last_screen(), screen("DoorOpen", "   80 % "));
    assert_eq!(rig.remote.value(RemoteKey::DialValue), "4");

    // Back up again.
    assert_eq!(rig.inputs.on_dial_rotation(6_500, true), Some(Event::DialIncrement));
    rig.drain();
    assert_eq!(rig.hw.positions(), vec![36, 0]);
    assert_eq!(rig.svc.dial_value(), 5);

    assert_eq!(rig.inputs.on_dial_button(), Some(Event::DialExitAdjust));
    rig.drain();
    assert_eq!(rig.shared.dial_mode(), DialMode::Locked);
    assert_eq!(rig.hw.last_screen(), screen("  Door  ", " Closed "));
}

#[test]
fn increment_at_closed_bound_does_nothing() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_dial_button();
    rig.drain();

    rig.inputs.on_dial_rotation(5_000, true);
    rig.drain();
    assert!(rig.hw.positions().is_empty());
    assert_eq!(rig.svc.dial_value(), 5);
}

#[test]
fn burst_that_does_not_fit_is_reported_and_rolled_back() {
    let mut rig = Rig::new(&[]);
    rig.drain();

    rig.queue.push_back(Event::DoorOpen).unwrap();
    // 28 left behind DoorOpen; the 8-event burst cannot fit.
    for _ in 0..28 {
        rig.queue.push_back(Event::SyncDialValue).unwrap();
    }

    rig.step(0).unwrap();
    assert_eq!(rig.svc.door_status(), DoorStatus::Closed);
    assert_eq!(rig.queue.len(), 28);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::HandlerFailed {
                event: Event::DoorOpen,
                error: Error::Queue(QueueError::Full(_)),
            }
        )),
        1
    );
}

#[test]
fn overflowing_input_is_counted_and_reported() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    for _ in 0..EVENT_QUEUE_CAP {
        rig.queue.push_back(Event::SyncDialValue).unwrap();
    }

    assert_eq!(rig.inputs.on_touch(), None);
    assert_eq!(rig.inputs.on_dial_button(), None);

    rig.step(0).unwrap();
    assert!(rig.sink.contains(&AppEvent::QueueOverflow { dropped: 2 }));

    // Reported once.
    rig.step(0).unwrap();
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::QueueOverflow { .. })),
        1
    );
}
