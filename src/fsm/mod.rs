//! Event dispatch engine.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  dispatch(event)                                           │
//! │  ┌──────────────────────┬─────────────────────────────┐    │
//! │  │ Sync*                │ outputs::sync_*             │    │
//! │  │ DoorOpen/Close/Halt  │ door::{open, close, halt}   │    │
//! │  │ DoorOpened/Closed    │ door::{opened, closed}      │    │
//! │  │ DoorStep*            │ door::step_*                │    │
//! │  │ Show*                │ outputs::show_*             │    │
//! │  │ Dial*                │ dial::*                     │    │
//! │  └──────────────────────┴─────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The match is exhaustive over [`Event`], so adding a variant without a
//! handler does not compile.  Every handler receives `&mut FsmContext`,
//! may push follow-up events, and writes its side effects into
//! `ctx.commands` for the service to apply.

pub mod context;
pub mod dial;
pub mod door;
pub mod outputs;

use context::{FsmContext, OutputCommands};

use crate::config::SystemConfig;
use crate::error::Error;
use crate::events::{Event, EventQueue};
use crate::shared::{DialMode, DoorStatus, SharedState};

/// Run the handler for `event`.  Clears the previous output commands first.
pub fn dispatch(ctx: &mut FsmContext, event: Event) -> Result<(), Error> {
    ctx.commands = OutputCommands::default();
    let result = match event {
        Event::SyncDoorStatus => outputs::sync_door_status(ctx),
        Event::SyncDialValue => outputs::sync_dial_value(ctx),
        Event::DoorOpen => door::open(ctx),
        Event::DoorOpened => door::opened(ctx),
        Event::DoorClose => door::close(ctx),
        Event::DoorClosed => door::closed(ctx),
        Event::DoorHalt => door::halt(ctx),
        Event::DoorStepOpen => door::step_open(ctx),
        Event::DoorStepClose => door::step_close(ctx),
        Event::ShowDoorStatus => outputs::show_door_status(ctx),
        Event::ShowDialValue => outputs::show_dial_value(ctx),
        Event::DialEnterAdjust => dial::enter_adjust(ctx),
        Event::DialExitAdjust => dial::exit_adjust(ctx),
        Event::DialIncrement => dial::increment(ctx),
        Event::DialDecrement => dial::decrement(ctx),
    };
    result.map_err(Error::from)
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the handler context and counts dispatched events.
pub struct Controller<'a> {
    ctx: FsmContext<'a>,
    dispatched: u64,
}

impl<'a> Controller<'a> {
    pub fn new(queue: &'a EventQueue, shared: &'a SharedState, config: SystemConfig) -> Self {
        Self {
            ctx: FsmContext::new(queue, shared, config),
            dispatched: 0,
        }
    }

    /// Execute one event that has already been removed from the queue.
    pub fn dispatch(&mut self, event: Event) -> Result<(), Error> {
        self.dispatched += 1;
        dispatch(&mut self.ctx, event)
    }

    /// Side effects requested by the last dispatched event.
    pub fn commands(&self) -> &OutputCommands {
        &self.ctx.commands
    }

    pub fn take_commands(&mut self) -> OutputCommands {
        core::mem::take(&mut self.ctx.commands)
    }

    pub fn door_status(&self) -> DoorStatus {
        self.ctx.door_status()
    }

    pub fn dial_mode(&self) -> DialMode {
        self.ctx.dial_mode()
    }

    pub fn dial_value(&self) -> i32 {
        self.ctx.dial_value
    }

    pub fn servo_angle(&self) -> i32 {
        self.ctx.servo_angle
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    pub fn queue(&self) -> &'a EventQueue {
        self.ctx.queue
    }

    /// Events executed since startup.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}
