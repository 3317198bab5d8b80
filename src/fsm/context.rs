//! Shared mutable context threaded through every event handler.
//!
//! `FsmContext` is the single struct that handlers read from and write
//! to.  It holds the dispatch-loop-owned counters (dial value, servo
//! angle), references to the ISR-visible state and the event queue, the
//! configuration, and the output commands produced by the last handler.
//! Handlers never touch hardware: the service applies `commands` through
//! the port traits after each dispatch.

use heapless::String;

use crate::config::SystemConfig;
use crate::events::{Event, EventQueue};
use crate::shared::{DialMode, DoorStatus, SharedState};

/// Character cells per display line.
pub const LCD_COLS: usize = 8;

/// One full display frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub line0: &'static str,
    pub line1: String<LCD_COLS>,
}

/// A value to push to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    DoorStatus(DoorStatus),
    DialValue(i32),
}

/// What the last handler did, for the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    DoorStatusChanged { from: DoorStatus, to: DoorStatus },
    /// A step moved the actuator.
    Stepped {
        event: Event,
        dial_value: i32,
        servo_angle: i32,
    },
    /// A step was refused because the dial is already at that bound.
    StepRefused(Event),
    /// Burst aborted; `purged` queued events were discarded.
    Halted { purged: u8 },
    DialModeChanged(DialMode),
}

// ---------------------------------------------------------------------------
// Output commands (written by handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// Commands a handler writes to request side effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputCommands {
    /// New servo angle in degrees.
    pub servo_angle: Option<i32>,
    /// Block the loop this long after moving the servo.
    pub settle_ms: u32,
    /// Frame to draw.
    pub screen: Option<Screen>,
    /// Value to publish.
    pub publish: Option<Publish>,
    pub outcome: Option<Outcome>,
}

impl OutputCommands {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The context passed to every handler function.
pub struct FsmContext<'a> {
    /// Pending work.  Handlers push follow-up events here.
    pub queue: &'a EventQueue,
    /// Door status and dial mode (read by the ISRs).
    pub shared: &'a SharedState,

    /// Remaining step-units to fully open: `dial_max` closed, `dial_min` open.
    pub dial_value: i32,
    /// Accumulated servo angle; only step handlers change it.
    pub servo_angle: i32,

    pub config: SystemConfig,

    /// Side effects requested by the current handler.
    pub commands: OutputCommands,
}

impl<'a> FsmContext<'a> {
    /// Power-on context: door closed, dial at `dial_max`, servo at 0°.
    pub fn new(queue: &'a EventQueue, shared: &'a SharedState, config: SystemConfig) -> Self {
        Self {
            queue,
            shared,
            dial_value: config.dial_max,
            servo_angle: 0,
            config,
            commands: OutputCommands::default(),
        }
    }

    pub fn door_status(&self) -> DoorStatus {
        self.shared.door_status()
    }

    /// Change the door status, recording the transition.
    pub fn set_door_status(&mut self, to: DoorStatus) {
        let from = self.shared.door_status();
        self.shared.set_door_status(to);
        self.commands.outcome = Some(Outcome::DoorStatusChanged { from, to });
    }

    pub fn dial_mode(&self) -> DialMode {
        self.shared.dial_mode()
    }

    /// Servo angle that corresponds to the current dial value.
    pub fn expected_angle(&self) -> i32 {
        (self.config.dial_max - self.dial_value) * self.config.step_degrees()
    }
}
