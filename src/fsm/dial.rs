//! Dial state machine handlers.
//!
//! ```text
//!  LOCKED ──[DialEnterAdjust]──▶ ADJUSTING ──[DialExitAdjust]──▶ LOCKED
//! ```
//!
//! While adjusting, each accepted rotation queues one door step followed
//! by a display refresh and a dial sync.  Turning the dial "up" moves the
//! door toward closed (dial value toward `dial_max`).

use super::context::{FsmContext, Outcome};
use crate::error::QueueError;
use crate::events::Event;
use crate::shared::DialMode;

pub fn enter_adjust(ctx: &mut FsmContext) -> Result<(), QueueError> {
    set_mode(ctx, DialMode::Adjusting);
    ctx.queue.push_back(Event::ShowDialValue)
}

pub fn exit_adjust(ctx: &mut FsmContext) -> Result<(), QueueError> {
    set_mode(ctx, DialMode::Locked);
    ctx.queue.push_back(Event::ShowDoorStatus)
}

pub fn increment(ctx: &mut FsmContext) -> Result<(), QueueError> {
    if ctx.dial_value >= ctx.config.dial_max {
        return Ok(());
    }
    ctx.queue.push_back_all(&[
        Event::DoorStepClose,
        Event::ShowDialValue,
        Event::SyncDialValue,
    ])
}

pub fn decrement(ctx: &mut FsmContext) -> Result<(), QueueError> {
    if ctx.dial_value <= ctx.config.dial_min {
        return Ok(());
    }
    ctx.queue.push_back_all(&[
        Event::DoorStepOpen,
        Event::ShowDialValue,
        Event::SyncDialValue,
    ])
}

fn set_mode(ctx: &mut FsmContext, mode: DialMode) {
    ctx.shared.set_dial_mode(mode);
    ctx.commands.outcome = Some(Outcome::DialModeChanged(mode));
}
