//! Interrupt bridge behaviour seen from the dispatch loop: the decision an
//! ISR takes depends on state the service published a moment earlier.

use garagedoor::events::Event;
use garagedoor::interrupts::{EVENT_QUEUE, INPUTS, SHARED_STATE};
use garagedoor::shared::{DialMode, DoorStatus};

use super::mock_hw::Rig;

#[test]
fn touch_follows_published_status() {
    let mut rig = Rig::new(&[]);
    rig.drain();

    assert_eq!(rig.inputs.on_touch(), Some(Event::DoorOpen));
    // Only DoorOpen runs: the status flips before the burst is stepped.
    rig.step(0).unwrap();
    assert_eq!(rig.shared.door_status(), DoorStatus::Opening);

    assert_eq!(rig.inputs.on_touch(), Some(Event::DoorHalt));
    assert_eq!(rig.queue.peek_front(), Ok(Event::DoorHalt));
}

#[test]
fn rotation_waits_for_adjust_mode_to_be_dispatched() {
    let mut rig = Rig::new(&[]);
    rig.drain();

    rig.inputs.on_dial_button();
    // DialEnterAdjust still pending: the dial is locked.
    assert_eq!(rig.inputs.on_dial_rotation(5_000, false), None);

    rig.step(0).unwrap();
    assert_eq!(rig.shared.dial_mode(), DialMode::Adjusting);
    assert_eq!(
        rig.inputs.on_dial_rotation(5_000, false),
        Some(Event::DialDecrement)
    );
}

#[test]
fn burst_is_contiguous_even_with_input_between_steps() {
    let mut rig = Rig::new(&[]);
    rig.drain();
    rig.inputs.on_touch();
    rig.step(0).unwrap();

    // A dial button press lands behind the whole burst.
    rig.inputs.on_dial_button();
    let pending = rig.queue.snapshot();
    assert_eq!(pending.len(), 2 + 5 + 1 + 1);
    assert_eq!(pending[7], Event::DoorOpened);
    assert_eq!(pending[8], Event::DialEnterAdjust);
}

#[test]
fn process_wide_bridge_is_wired_to_the_static_queue() {
    // The only test in this binary touching the statics.
    SHARED_STATE.reset();
    EVENT_QUEUE.clear();

    assert_eq!(INPUTS.on_touch(), Some(Event::DoorOpen));
    SHARED_STATE.set_door_status(DoorStatus::Closing);
    assert_eq!(INPUTS.on_touch(), Some(Event::DoorHalt));
    assert_eq!(
        EVENT_QUEUE.snapshot().as_slice(),
        &[Event::DoorHalt, Event::DoorOpen]
    );
    EVENT_QUEUE.clear();
}
