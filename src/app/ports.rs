//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorService (domain)
//! ```
//!
//! Driven adapters (servo, display, remote store, entropy, event sinks)
//! implement these traits.  The [`DoorService`](super::service::DoorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! The settle delay after a servo step goes through
//! [`embedded_hal::delay::DelayNs`] rather than a port of our own.

use crate::error::RemoteError;
use crate::remote::RemoteKey;
use crate::remote::wire::Value;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → servo)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the door actuator.
pub trait ActuatorPort {
    /// Move to an absolute angle in degrees.  Fire-and-forget.
    fn set_position(&mut self, angle_degrees: i32);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → 8x2 character display)
// ───────────────────────────────────────────────────────────────

/// Two fixed-width text lines.  The domain pads and formats; the adapter
/// only draws.
pub trait DisplayPort {
    fn show_lines(&mut self, line0: &str, line1: &str);
}

// ───────────────────────────────────────────────────────────────
// Remote store port (driven adapter: domain ↔ key-value service)
// ───────────────────────────────────────────────────────────────

/// Remote key-value store shared with the companion app.
///
/// Implementations own transport concerns (timeouts, authentication).
/// The domain never retries: a failed call is logged and forgotten.
pub trait RemoteStorePort {
    fn put(&mut self, key: RemoteKey, value: &str) -> Result<(), RemoteError>;

    /// Current value of `key`.  An absent key reads as an empty value.
    fn get(&mut self, key: RemoteKey) -> Result<Value, RemoteError>;
}

// ───────────────────────────────────────────────────────────────
// Token source port (driven adapter: domain ← entropy)
// ───────────────────────────────────────────────────────────────

/// Source of raw entropy for remote command tokens.
pub trait TokenSource {
    fn next_token(&mut self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the remote link)
// ───────────────────────────────────────────────────────────────

/// Callback trait that the scheduler invokes when an idle task is due.
///
/// This decouples the [`Scheduler`](crate::scheduler::Scheduler) from the
/// remote store and the event queue: the scheduler only keeps time.
pub trait SchedulerDelegate {
    /// Run `task` now.
    fn run_idle_task(&mut self, task: IdleTask);

    /// Whether `task` should run on this pass even if its period has not
    /// elapsed.
    fn wants_now(&self, task: IdleTask) -> bool {
        let _ = task;
        false
    }
}

/// Idle-time tasks, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTask {
    /// Publish a fresh command token.
    TokenRotation,
    /// Fetch and ingest the pending remote command.
    CommandPoll,
}
