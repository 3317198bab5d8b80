//! Unified error types for the garage door firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! dispatch loop's error handling uniform.  All variants are `Copy` so they
//! can be passed out of interrupt-adjacent code without allocation.

use core::fmt;

use crate::events::Event;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The event queue rejected an operation.
    Queue(QueueError),
    /// A remote command payload could not be parsed.
    Command(CommandError),
    /// The remote key-value store could not be reached or answered badly.
    Remote(RemoteError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl Error {
    /// `true` for errors that indicate a logic defect in the core rather
    /// than an environmental condition.  The binary halts on these.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Queue(QueueError::Empty))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue(e) => write!(f, "queue: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Remote(e) => write!(f, "remote: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Queue errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Peek or pop on an empty queue.  Callers must check `is_empty()`
    /// first, so this is always a programming error.
    Empty,
    /// The fixed-capacity queue had no room; the event was dropped.
    Full(Event),
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "event queue is empty"),
            Self::Full(ev) => write!(f, "event queue full, dropped {ev:?}"),
        }
    }
}

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}

// ---------------------------------------------------------------------------
// Remote command errors
// ---------------------------------------------------------------------------

/// Why a remote command payload was malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Nothing pending (empty or placeholder payload).
    Empty,
    /// The `z` separator between event id and token is missing.
    MissingDelimiter,
    /// The event id field is not a decimal integer.
    InvalidEventId,
    /// The token field is not a decimal integer.
    InvalidToken,
    /// The event id parsed but names no remote-triggerable intent.
    UnknownEvent(u8),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no command pending"),
            Self::MissingDelimiter => write!(f, "missing 'z' delimiter"),
            Self::InvalidEventId => write!(f, "event id is not numeric"),
            Self::InvalidToken => write!(f, "token is not numeric"),
            Self::UnknownEvent(id) => write!(f, "unknown event id {id}"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Remote store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteError {
    /// Transport failure (no network, server down, timeout).
    Unavailable,
    /// The stored value does not fit the fixed-size value buffer.
    ValueTooLong,
    /// The server answered with an unexpected status or body.
    Protocol,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "remote store unavailable"),
            Self::ValueTooLong => write!(f, "value too long"),
            Self::Protocol => write!(f, "unexpected response"),
        }
    }
}

impl From<RemoteError> for Error {
    fn from(e: RemoteError) -> Self {
        Self::Remote(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
