//! Interrupt-safe event queue.
//!
//! Events are produced by:
//! - GPIO ISRs (touch sensor, encoder button, encoder rotation)
//! - The remote command poller (idle-time, main loop)
//! - Event handlers themselves (compound intents expand into step bursts)
//!
//! Events are consumed by the dispatch loop, which executes exactly one
//! event per iteration.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISRs   │────▶│              │     │              │
//! │ Remote poll │────▶│  Event Queue │────▶│ Dispatch loop│
//! │ Handlers    │────▶│  (deque, cs) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The queue is FIFO except for [`EventQueue::push_front`], the emergency
//! path a halt uses to jump ahead of an already-queued step burst.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use critical_section::Mutex;
use heapless::Deque;

use crate::error::QueueError;

/// Maximum number of pending events.
/// The largest single expansion is a full door burst (dial range + 3).
pub const EVENT_QUEUE_CAP: usize = 32;

/// Every unit of work the dispatch loop understands.
///
/// Events carry no payload; handlers read the context at dispatch time.
/// Discriminants are the wire ids used by remote commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Event {
    // ── Remote sync ───────────────────────────────────────
    /// Publish the current door status.
    SyncDoorStatus = 0,
    /// Publish the current dial value.
    SyncDialValue = 1,

    // ── Door intents ──────────────────────────────────────
    /// Start opening: expands into a step burst.
    DoorOpen = 2,
    /// Completion marker of an open burst.
    DoorOpened = 3,
    /// Start closing: expands into a step burst.
    DoorClose = 4,
    /// Completion marker of a close burst.
    DoorClosed = 5,
    /// Abort the in-progress burst where it stands.
    DoorHalt = 6,

    // ── Door step actions ─────────────────────────────────
    /// One unit of opening movement.
    DoorStepOpen = 7,
    /// One unit of closing movement.
    DoorStepClose = 8,

    // ── Display ───────────────────────────────────────────
    ShowDoorStatus = 9,
    ShowDialValue = 10,

    // ── Dial ──────────────────────────────────────────────
    DialEnterAdjust = 11,
    DialExitAdjust = 12,
    DialIncrement = 13,
    DialDecrement = 14,
}

impl Event {
    /// Total number of event kinds.
    pub const COUNT: usize = 15;

    /// Every event kind, in discriminant order.
    pub const ALL: [Event; Event::COUNT] = [
        Event::SyncDoorStatus,
        Event::SyncDialValue,
        Event::DoorOpen,
        Event::DoorOpened,
        Event::DoorClose,
        Event::DoorClosed,
        Event::DoorHalt,
        Event::DoorStepOpen,
        Event::DoorStepClose,
        Event::ShowDoorStatus,
        Event::ShowDialValue,
        Event::DialEnterAdjust,
        Event::DialExitAdjust,
        Event::DialIncrement,
        Event::DialDecrement,
    ];

    /// Map a wire id back to an event.
    pub fn from_u8(raw: u8) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }
}

// ── Queue ─────────────────────────────────────────────────────
//
// Shared between the dispatch loop and every ISR.  All access goes
// through `critical_section::with`, so a push from an ISR can never
// observe (or corrupt) a half-finished pop in the main loop.

/// Double-ended event queue guarded by a critical section.
pub struct EventQueue {
    events: Mutex<RefCell<Deque<Event, EVENT_QUEUE_CAP>>>,
    /// Events dropped because the queue was full.  Written from ISRs.
    dropped: AtomicU32,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Deque::new())),
            dropped: AtomicU32::new(0),
        }
    }

    /// `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.events.borrow_ref(cs).is_empty())
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.events.borrow_ref(cs).len())
    }

    /// The next event to execute.
    pub fn peek_front(&self) -> Result<Event, QueueError> {
        critical_section::with(|cs| {
            self.events
                .borrow_ref(cs)
                .front()
                .copied()
                .ok_or(QueueError::Empty)
        })
    }

    /// Append to the back (normal FIFO path).
    pub fn push_back(&self, event: Event) -> Result<(), QueueError> {
        let pushed =
            critical_section::with(|cs| self.events.borrow_ref_mut(cs).push_back(event).is_ok());
        self.record(pushed, event)
    }

    /// Insert at the front, ahead of everything already queued.
    pub fn push_front(&self, event: Event) -> Result<(), QueueError> {
        let pushed =
            critical_section::with(|cs| self.events.borrow_ref_mut(cs).push_front(event).is_ok());
        self.record(pushed, event)
    }

    /// Append a whole expansion atomically: either every event lands,
    /// contiguous and in order, or none does.
    pub fn push_back_all(&self, batch: &[Event]) -> Result<(), QueueError> {
        let Some(&first) = batch.first() else {
            return Ok(());
        };
        let pushed = critical_section::with(|cs| {
            let mut events = self.events.borrow_ref_mut(cs);
            if events.capacity() - events.len() < batch.len() {
                return false;
            }
            for &ev in batch {
                // Room was checked under the same critical section.
                let _ = events.push_back(ev);
            }
            true
        });
        self.record(pushed, first)
    }

    /// Remove the front event (the one `peek_front` returned).
    pub fn pop_front(&self) -> Result<Event, QueueError> {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).pop_front())
            .ok_or(QueueError::Empty)
    }

    /// Pop the front event only if `pred` accepts it.  Peek and pop happen
    /// inside one critical section.
    pub fn pop_front_if(&self, pred: impl Fn(Event) -> bool) -> Option<Event> {
        critical_section::with(|cs| {
            let mut events = self.events.borrow_ref_mut(cs);
            match events.front() {
                Some(&ev) if pred(ev) => events.pop_front(),
                _ => None,
            }
        })
    }

    /// Copy of the pending events, front first.
    pub fn snapshot(&self) -> heapless::Vec<Event, EVENT_QUEUE_CAP> {
        critical_section::with(|cs| self.events.borrow_ref(cs).iter().copied().collect())
    }

    /// Drop everything pending.
    pub fn clear(&self) {
        critical_section::with(|cs| self.events.borrow_ref_mut(cs).clear());
    }

    /// Read and reset the overflow counter.
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::AcqRel)
    }

    fn record(&self, pushed: bool, event: Event) -> Result<(), QueueError> {
        if pushed {
            Ok(())
        } else {
            self.dropped.fetch_add(1, Ordering::AcqRel);
            Err(QueueError::Full(event))
        }
    }
}
