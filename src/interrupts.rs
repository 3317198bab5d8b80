//! Interrupt bridge: raw edge interrupts → queued events.
//!
//! ## Hardware
//!
//! | Source            | Edge    | Decision input        | Event(s)                        |
//! |-------------------|---------|-----------------------|---------------------------------|
//! | Touch sensor      | rising  | door status           | `DoorOpen` / `DoorClose` / `DoorHalt` (front) |
//! | Encoder button    | rising  | dial mode             | `DialEnterAdjust` / `DialExitAdjust` |
//! | Encoder CLK       | falling | dial mode, DAT level  | `DialIncrement` / `DialDecrement` |
//!
//! Every handler is bounded: a couple of atomic loads, at most one atomic
//! store and one critical-section queue insertion.  Nothing here blocks,
//! allocates or logs.  A full queue drops the event; the queue counts the
//! drop and the dispatch loop reports it.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::events::{Event, EventQueue};
use crate::shared::{DialMode, DoorStatus, SharedState};

/// Default minimum gap between two accepted rotation edges.
pub const ROTATION_DEBOUNCE_MS: u32 = 1000;

// ── Process-wide singletons ─────────────────────────────────────
//
// ISR entry points are plain `extern "C"` functions without a context
// pointer, so the queue, the shared state and the bridge live in statics.

/// The single event queue drained by the dispatch loop.
pub static EVENT_QUEUE: EventQueue = EventQueue::new();

/// Door status and dial mode, written by the dispatch loop and read in ISRs.
pub static SHARED_STATE: SharedState = SharedState::new();

/// Bridge wired to [`EVENT_QUEUE`] and [`SHARED_STATE`].
pub static INPUTS: InputBridge<'static> = InputBridge::new(&SHARED_STATE, &EVENT_QUEUE);

/// Translates interrupt edges into queue insertions.
pub struct InputBridge<'a> {
    state: &'a SharedState,
    queue: &'a EventQueue,
    /// Timestamp (ms since boot) of the last accepted rotation edge.
    last_rotation_ms: AtomicU32,
    rotation_debounce_ms: AtomicU32,
}

impl<'a> InputBridge<'a> {
    pub const fn new(state: &'a SharedState, queue: &'a EventQueue) -> Self {
        Self {
            state,
            queue,
            last_rotation_ms: AtomicU32::new(0),
            rotation_debounce_ms: AtomicU32::new(ROTATION_DEBOUNCE_MS),
        }
    }

    /// Override the rotation debounce window.  Call once at boot, before
    /// the encoder interrupt is enabled.
    pub fn set_rotation_debounce_ms(&self, ms: u32) {
        self.rotation_debounce_ms.store(ms, Ordering::Release);
    }

    /// Touch sensor rising edge.
    ///
    /// A door at rest toggles; a moving door is halted through the
    /// emergency path so the halt runs before the rest of the burst.
    pub fn on_touch(&self) -> Option<Event> {
        let (event, emergency) = match self.state.door_status() {
            DoorStatus::Closed => (Event::DoorOpen, false),
            DoorStatus::Opened => (Event::DoorClose, false),
            DoorStatus::Opening | DoorStatus::Closing => (Event::DoorHalt, true),
        };
        let pushed = if emergency {
            self.queue.push_front(event)
        } else {
            self.queue.push_back(event)
        };
        pushed.ok().map(|()| event)
    }

    /// Encoder push-button rising edge: toggle the dial mode.
    pub fn on_dial_button(&self) -> Option<Event> {
        let event = match self.state.dial_mode() {
            DialMode::Locked => Event::DialEnterAdjust,
            DialMode::Adjusting => Event::DialExitAdjust,
        };
        self.queue.push_back(event).ok().map(|()| event)
    }

    /// Encoder CLK falling edge.
    ///
    /// `now_ms` is the ISR timestamp, `data_high` the DAT line level
    /// sampled in the same ISR (high = clockwise = increment).
    pub fn on_dial_rotation(&self, now_ms: u32, data_high: bool) -> Option<Event> {
        if self.state.dial_mode() != DialMode::Adjusting {
            return None;
        }

        let last = self.last_rotation_ms.load(Ordering::Acquire);
        let window = self.rotation_debounce_ms.load(Ordering::Relaxed);
        if now_ms.wrapping_sub(last) < window {
            return None;
        }
        self.last_rotation_ms.store(now_ms, Ordering::Release);

        let event = if data_high {
            Event::DialIncrement
        } else {
            Event::DialDecrement
        };
        self.queue.push_back(event).ok().map(|()| event)
    }
}
