//! Door state machine handlers.
//!
//! ```text
//!  CLOSED ──[DoorOpen]──▶ OPENING ──[DoorOpened]──▶ OPENED
//!    ▲                      │  ▲                      │
//!    │                 [DoorHalt] (stays OPENING)  [DoorClose]
//!    │                                                ▼
//!    └─────────[DoorClosed]───────────────────────  CLOSING
//! ```
//!
//! An intent expands into a burst on the queue:
//!
//! ```text
//!  DoorOpen → ShowDoorStatus, SyncDoorStatus, DoorStepOpen × n, DoorOpened
//! ```
//!
//! The whole burst is inserted in one critical section so nothing can
//! interleave with it except an emergency halt at the front.

use heapless::Vec;
use log::{debug, warn};

use super::context::{FsmContext, Outcome};
use crate::error::QueueError;
use crate::events::{EVENT_QUEUE_CAP, Event};
use crate::shared::DoorStatus;

type Burst = Vec<Event, EVENT_QUEUE_CAP>;

/// `ShowDoorStatus, SyncDoorStatus, step × count, marker`
fn burst(step: Event, count: i32, marker: Event) -> Result<Burst, QueueError> {
    let mut out = Burst::new();
    let head = [Event::ShowDoorStatus, Event::SyncDoorStatus];
    out.extend_from_slice(&head)
        .map_err(|()| QueueError::Full(step))?;
    for _ in 0..count.max(0) {
        out.push(step).map_err(QueueError::Full)?;
    }
    out.push(marker).map_err(QueueError::Full)?;
    Ok(out)
}

/// Set `status`, queue `events`, and roll the status back if the queue
/// cannot take them.
fn begin_motion(
    ctx: &mut FsmContext,
    status: DoorStatus,
    events: &[Event],
) -> Result<(), QueueError> {
    let previous = ctx.door_status();
    ctx.set_door_status(status);
    if let Err(e) = ctx.queue.push_back_all(events) {
        ctx.shared.set_door_status(previous);
        ctx.commands.outcome = None;
        return Err(e);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
//  Opening
// ═══════════════════════════════════════════════════════════════════════════

pub fn open(ctx: &mut FsmContext) -> Result<(), QueueError> {
    let status = ctx.door_status();
    if status != DoorStatus::Closed {
        warn!("DOOR: open requested while {:?}", status);
    }
    let steps = ctx.dial_value - ctx.config.dial_min;
    let events = burst(Event::DoorStepOpen, steps, Event::DoorOpened)?;
    begin_motion(ctx, DoorStatus::Opening, &events)
}

pub fn step_open(ctx: &mut FsmContext) -> Result<(), QueueError> {
    if ctx.dial_value <= ctx.config.dial_min {
        warn!("DOOR: already fully open, step ignored");
        ctx.commands.outcome = Some(Outcome::StepRefused(Event::DoorStepOpen));
        return Ok(());
    }
    ctx.servo_angle += ctx.config.step_degrees();
    ctx.dial_value -= 1;
    apply_step(ctx, Event::DoorStepOpen);
    Ok(())
}

pub fn opened(ctx: &mut FsmContext) -> Result<(), QueueError> {
    ctx.set_door_status(DoorStatus::Opened);
    ctx.dial_value = ctx.config.dial_min;
    note_drift(ctx);
    ctx.queue.push_back_all(&[
        Event::ShowDoorStatus,
        Event::SyncDoorStatus,
        Event::SyncDialValue,
    ])
}

// ═══════════════════════════════════════════════════════════════════════════
//  Closing
// ═══════════════════════════════════════════════════════════════════════════

pub fn close(ctx: &mut FsmContext) -> Result<(), QueueError> {
    let status = ctx.door_status();
    if status != DoorStatus::Opened {
        warn!("DOOR: close requested while {:?}", status);
    }
    let steps = ctx.config.dial_max - ctx.dial_value;
    let events = burst(Event::DoorStepClose, steps, Event::DoorClosed)?;
    begin_motion(ctx, DoorStatus::Closing, &events)
}

pub fn step_close(ctx: &mut FsmContext) -> Result<(), QueueError> {
    if ctx.dial_value >= ctx.config.dial_max {
        warn!("DOOR: already fully closed, step ignored");
        ctx.commands.outcome = Some(Outcome::StepRefused(Event::DoorStepClose));
        return Ok(());
    }
    ctx.servo_angle -= ctx.config.step_degrees();
    ctx.dial_value += 1;
    apply_step(ctx, Event::DoorStepClose);
    Ok(())
}

pub fn closed(ctx: &mut FsmContext) -> Result<(), QueueError> {
    ctx.set_door_status(DoorStatus::Closed);
    ctx.dial_value = ctx.config.dial_max;
    note_drift(ctx);
    ctx.queue.push_back_all(&[
        Event::ShowDoorStatus,
        Event::SyncDoorStatus,
        Event::SyncDialValue,
    ])
}

/// The completion markers snap the dial to its bound without moving the
/// servo, so mixed manual and remote use can leave the two apart.
fn note_drift(ctx: &FsmContext) {
    let expected = ctx.expected_angle();
    if ctx.servo_angle != expected {
        warn!(
            "DOOR: servo at {}° but dial {} implies {}°",
            ctx.servo_angle, ctx.dial_value, expected
        );
    }
}

fn apply_step(ctx: &mut FsmContext, event: Event) {
    ctx.commands.servo_angle = Some(ctx.servo_angle);
    ctx.commands.settle_ms = ctx.config.step_settle_ms;
    ctx.commands.outcome = Some(Outcome::Stepped {
        event,
        dial_value: ctx.dial_value,
        servo_angle: ctx.servo_angle,
    });
}

// ═══════════════════════════════════════════════════════════════════════════
//  Halt
// ═══════════════════════════════════════════════════════════════════════════

/// Abort the burst in progress.
///
/// Removes, from the queue front: duplicate halts, then the run of
/// step events for the current direction, then that burst's completion
/// marker if it is now at the front.  The status stays Opening/Closing
/// and the door stays wherever the last executed step left it.
///
/// Only a step run at the front is purged.  A halt dispatched while the
/// burst's `ShowDoorStatus`/`SyncDoorStatus` are still ahead of the steps
/// finds nothing to remove, and the motion runs to completion.
pub fn halt(ctx: &mut FsmContext) -> Result<(), QueueError> {
    let mut purged: u8 = 0;
    while ctx.queue.pop_front_if(|e| e == Event::DoorHalt).is_some() {
        purged = purged.saturating_add(1);
    }

    let target = match ctx.door_status() {
        DoorStatus::Opening => Some((Event::DoorStepOpen, Event::DoorOpened)),
        DoorStatus::Closing => Some((Event::DoorStepClose, Event::DoorClosed)),
        DoorStatus::Opened | DoorStatus::Closed => None,
    };
    if let Some((step, marker)) = target {
        while ctx.queue.pop_front_if(|e| e == step).is_some() {
            purged = purged.saturating_add(1);
        }
        if ctx.queue.pop_front_if(|e| e == marker).is_some() {
            purged = purged.saturating_add(1);
        }
    } else {
        debug!("DOOR: halt with no motion in progress");
    }

    ctx.commands.outcome = Some(Outcome::Halted { purged });
    ctx.queue
        .push_back_all(&[Event::SyncDoorStatus, Event::SyncDialValue])
}
