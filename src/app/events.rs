//! Outbound application events.
//!
//! The [`DoorService`](super::service::DoorService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, ...).

use crate::error::{CommandError, Error, RemoteError};
use crate::events::Event;
use crate::remote::{Rejection, RemoteIntent, RemoteKey};
use crate::shared::{DialMode, DoorStatus};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries the initial state).
    Started { status: DoorStatus, dial_value: i32 },

    /// The door status changed.
    DoorStatusChanged { from: DoorStatus, to: DoorStatus },

    /// A step moved the actuator.
    StepExecuted {
        event: Event,
        dial_value: i32,
        servo_angle: i32,
    },

    /// A step was ignored because the dial was already at that bound.
    StepRefused(Event),

    /// A burst was aborted.
    Halted { purged: u8 },

    /// The dial switched between locked and adjusting.
    DialModeChanged(DialMode),

    /// A fresh token was published.
    TokenIssued(u32),

    /// A remote command passed token validation and was queued.
    CommandAccepted(RemoteIntent),

    /// A well-formed remote command carried the wrong token.
    CommandRejected(Rejection),

    /// A remote command payload could not be parsed.
    CommandMalformed(CommandError),

    /// A remote store call failed.
    RemoteUnavailable { key: RemoteKey, error: RemoteError },

    /// Events were dropped because the queue was full.
    QueueOverflow { dropped: u32 },

    /// A handler failed without stopping the loop.
    HandlerFailed { event: Event, error: Error },
}
