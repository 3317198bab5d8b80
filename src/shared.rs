//! State read from interrupt context.
//!
//! The ISRs decide *which* event to enqueue by looking at the door status
//! and the dial mode.  Both live in atomics so a read from an ISR is a
//! single load, never a torn value, and the dispatch loop is the only
//! writer.

use core::sync::atomic::{AtomicU8, Ordering};

/// Physical door status.
///
/// Discriminants are the wire codes published to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DoorStatus {
    Opened = 0,
    Closed = 1,
    Opening = 2,
    Closing = 3,
}

impl DoorStatus {
    /// Code published under the door-status remote key.
    pub fn wire_code(self) -> u8 {
        self as u8
    }

    pub fn from_wire(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Opened),
            1 => Some(Self::Closed),
            2 => Some(Self::Opening),
            3 => Some(Self::Closing),
            _ => None,
        }
    }

    /// `true` while a burst is (or was, before a halt) in progress.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

/// Whether the rotary dial currently drives the door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DialMode {
    /// Rotation is ignored.
    Locked = 0,
    /// Rotation steps the door.
    Adjusting = 1,
}

impl DialMode {
    fn from_raw(raw: u8) -> Self {
        if raw == Self::Adjusting as u8 {
            Self::Adjusting
        } else {
            Self::Locked
        }
    }
}

/// ISR-visible half of the controller state.
pub struct SharedState {
    door_status: AtomicU8,
    dial_mode: AtomicU8,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    /// Power-on state: door closed, dial locked.
    pub const fn new() -> Self {
        Self {
            door_status: AtomicU8::new(DoorStatus::Closed as u8),
            dial_mode: AtomicU8::new(DialMode::Locked as u8),
        }
    }

    pub fn door_status(&self) -> DoorStatus {
        // Only valid codes are ever stored.
        DoorStatus::from_wire(self.door_status.load(Ordering::Acquire))
            .unwrap_or(DoorStatus::Closed)
    }

    /// Dispatch loop only.
    pub fn set_door_status(&self, status: DoorStatus) {
        self.door_status.store(status as u8, Ordering::Release);
    }

    pub fn dial_mode(&self) -> DialMode {
        DialMode::from_raw(self.dial_mode.load(Ordering::Acquire))
    }

    /// Dispatch loop only.
    pub fn set_dial_mode(&self, mode: DialMode) {
        self.dial_mode.store(mode as u8, Ordering::Release);
    }

    /// Back to the power-on state.
    pub fn reset(&self) {
        self.set_door_status(DoorStatus::Closed);
        self.set_dial_mode(DialMode::Locked);
    }
}
