//! Application service: the hexagonal core.
//!
//! [`DoorService`] owns the event dispatcher, the remote link and the idle
//! scheduler.  All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!   EventQueue ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │      DoorService       │
//!  ActuatorPort ◀──│  dispatch · scheduler  │──▶ RemoteStorePort
//!   DisplayPort ◀──│  remote link           │◀── TokenSource
//!                  └────────────────────────┘
//! ```
//!
//! One call to [`DoorService::step`] is one loop iteration: either exactly
//! one event is executed, or (queue empty) the idle tasks get a chance.

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::{CommandError, Error};
use crate::events::{Event, EventQueue};
use crate::fsm::Controller;
use crate::fsm::context::{Outcome, OutputCommands, Publish};
use crate::remote::{RemoteCommand, RemoteKey, RemoteLink, wire};
use crate::scheduler::Scheduler;
use crate::shared::{DoorStatus, SharedState};

use super::events::AppEvent;
use super::ports::{
    ActuatorPort, DisplayPort, EventSink, IdleTask, RemoteStorePort, SchedulerDelegate,
    TokenSource,
};

/// What one loop iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The queue was non-empty; this event was executed.
    Dispatched(Event),
    /// The queue was empty; this many idle tasks ran.
    Idle { tasks_run: usize },
}

// ───────────────────────────────────────────────────────────────
// DoorService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct DoorService<'a> {
    controller: Controller<'a>,
    queue: &'a EventQueue,
    link: RemoteLink,
    scheduler: Scheduler,
}

impl<'a> DoorService<'a> {
    /// Construct the service.  Idle periods start counting at `now_ms`.
    ///
    /// Does **not** touch any port; call [`start`](Self::start) next.
    pub fn new(
        queue: &'a EventQueue,
        shared: &'a SharedState,
        config: SystemConfig,
        now_ms: u32,
    ) -> Self {
        let link = RemoteLink::new(config.token_modulus);
        let scheduler = Scheduler::new(&config, now_ms);
        Self {
            controller: Controller::new(queue, shared, config),
            queue,
            link,
            scheduler,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Publish the initial state and queue the first display refresh.
    ///
    /// Remote failures are reported and otherwise ignored.
    pub fn start(
        &mut self,
        remote: &mut impl RemoteStorePort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        let status = self.controller.door_status();
        let dial_value = self.controller.dial_value();

        put_reporting(remote, sink, RemoteKey::Token, "");
        put_reporting(remote, sink, RemoteKey::DoorStatus, &wire::door_status(status));
        put_reporting(remote, sink, RemoteKey::DialValue, &wire::integer(dial_value.into()));

        self.queue.push_back(Event::ShowDoorStatus)?;
        sink.emit(&AppEvent::Started { status, dial_value });
        info!("DoorService started: {:?}, dial {}", status, dial_value);
        Ok(())
    }

    // ── Per-iteration orchestration ──────────────────────────

    /// Run one loop iteration.
    ///
    /// The `hw` parameter satisfies the actuator, display **and** delay
    /// boundaries, which avoids three mutable borrows of one peripheral
    /// bundle.  Only a fatal error (see [`Error::is_fatal`]) is returned;
    /// everything else is reported through `sink`.
    pub fn step(
        &mut self,
        now_ms: u32,
        hw: &mut (impl ActuatorPort + DisplayPort + DelayNs),
        remote: &mut impl RemoteStorePort,
        tokens: &mut impl TokenSource,
        sink: &mut impl EventSink,
    ) -> Result<Step, Error> {
        let dropped = self.queue.take_dropped();
        if dropped > 0 {
            sink.emit(&AppEvent::QueueOverflow { dropped });
        }

        if self.queue.is_empty() {
            let mut runner = IdleRunner {
                link: &mut self.link,
                queue: self.queue,
                remote,
                tokens,
                sink,
            };
            let tasks_run = self.scheduler.poll(now_ms, &mut runner);
            return Ok(Step::Idle { tasks_run });
        }

        // Removed before running: handlers that inspect the queue only
        // see pending work.
        let event = self.queue.pop_front()?;
        debug!("Dispatch #{}: {:?}", self.controller.dispatched() + 1, event);
        if let Err(error) = self.controller.dispatch(event) {
            if error.is_fatal() {
                return Err(error);
            }
            warn!("Handler for {:?} failed: {}", event, error);
            sink.emit(&AppEvent::HandlerFailed { event, error });
        }

        let commands = self.controller.take_commands();
        apply_commands(commands, hw, remote, sink);
        Ok(Step::Dispatched(event))
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn door_status(&self) -> DoorStatus {
        self.controller.door_status()
    }

    pub fn dial_value(&self) -> i32 {
        self.controller.dial_value()
    }

    pub fn servo_angle(&self) -> i32 {
        self.controller.servo_angle()
    }

    /// Token currently published, if any.
    pub fn token(&self) -> Option<u32> {
        self.link.token()
    }

    pub fn controller(&self) -> &Controller<'a> {
        &self.controller
    }

    pub fn link(&self) -> &RemoteLink {
        &self.link
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

// ───────────────────────────────────────────────────────────────
// Side effects
// ───────────────────────────────────────────────────────────────

/// Translate handler output commands into port calls.
fn apply_commands(
    commands: OutputCommands,
    hw: &mut (impl ActuatorPort + DisplayPort + DelayNs),
    remote: &mut impl RemoteStorePort,
    sink: &mut impl EventSink,
) {
    // ── Actuator ─────────────────────────────────────────────
    if let Some(angle) = commands.servo_angle {
        hw.set_position(angle);
        if commands.settle_ms > 0 {
            hw.delay_ms(commands.settle_ms);
        }
    }

    // ── Display ──────────────────────────────────────────────
    if let Some(screen) = &commands.screen {
        hw.show_lines(screen.line0, &screen.line1);
    }

    // ── Remote sync ──────────────────────────────────────────
    match commands.publish {
        Some(Publish::DoorStatus(status)) => {
            put_reporting(remote, sink, RemoteKey::DoorStatus, &wire::door_status(status));
        }
        Some(Publish::DialValue(value)) => {
            put_reporting(remote, sink, RemoteKey::DialValue, &wire::integer(value.into()));
        }
        None => {}
    }

    if let Some(outcome) = commands.outcome {
        sink.emit(&outcome_event(outcome));
    }
}

fn outcome_event(outcome: Outcome) -> AppEvent {
    match outcome {
        Outcome::DoorStatusChanged { from, to } => AppEvent::DoorStatusChanged { from, to },
        Outcome::Stepped {
            event,
            dial_value,
            servo_angle,
        } => AppEvent::StepExecuted {
            event,
            dial_value,
            servo_angle,
        },
        Outcome::StepRefused(event) => AppEvent::StepRefused(event),
        Outcome::Halted { purged } => AppEvent::Halted { purged },
        Outcome::DialModeChanged(mode) => AppEvent::DialModeChanged(mode),
    }
}

fn put_reporting(
    remote: &mut impl RemoteStorePort,
    sink: &mut impl EventSink,
    key: RemoteKey,
    value: &str,
) {
    if let Err(error) = remote.put(key, value) {
        sink.emit(&AppEvent::RemoteUnavailable { key, error });
    }
}

// ───────────────────────────────────────────────────────────────
// Idle tasks
// ───────────────────────────────────────────────────────────────
//
// Bridges the scheduler (which only keeps time) to the remote link and
// the event queue.

struct IdleRunner<'r, R, T, S> {
    link: &'r mut RemoteLink,
    queue: &'r EventQueue,
    remote: &'r mut R,
    tokens: &'r mut T,
    sink: &'r mut S,
}

impl<R: RemoteStorePort, T: TokenSource, S: EventSink> IdleRunner<'_, R, T, S> {
    fn rotate_token(&mut self) {
        let token = self.link.issue(self.tokens.next_token());
        put_reporting(
            &mut *self.remote,
            &mut *self.sink,
            RemoteKey::Token,
            &wire::integer(token.into()),
        );
        self.sink.emit(&AppEvent::TokenIssued(token));
    }

    fn poll_command(&mut self) {
        let raw = match self.remote.get(RemoteKey::Command) {
            Ok(raw) => raw,
            Err(error) => {
                self.sink.emit(&AppEvent::RemoteUnavailable {
                    key: RemoteKey::Command,
                    error,
                });
                return;
            }
        };

        let command = match RemoteCommand::parse(&raw) {
            Ok(command) => command,
            Err(CommandError::Empty) => {
                debug!("No remote command pending");
                return;
            }
            Err(e) => {
                self.sink.emit(&AppEvent::CommandMalformed(e));
                return;
            }
        };

        match self.link.authorize(&command) {
            Ok(intent) => {
                let event = intent.event();
                let queued = if intent.is_emergency() {
                    self.queue.push_front(event)
                } else {
                    self.queue.push_back(event)
                };
                // A full queue counts the drop; the next step reports it.
                if queued.is_ok() {
                    self.sink.emit(&AppEvent::CommandAccepted(intent));
                }
            }
            Err(rejection) => self.sink.emit(&AppEvent::CommandRejected(rejection)),
        }
    }
}

impl<R: RemoteStorePort, T: TokenSource, S: EventSink> SchedulerDelegate
    for IdleRunner<'_, R, T, S>
{
    fn run_idle_task(&mut self, task: IdleTask) {
        match task {
            IdleTask::TokenRotation => self.rotate_token(),
            IdleTask::CommandPoll => self.poll_command(),
        }
    }

    fn wants_now(&self, task: IdleTask) -> bool {
        task == IdleTask::TokenRotation && self.link.needs_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_map_one_to_one() {
        let event = outcome_event(Outcome::Halted { purged: 4 });
        assert_eq!(event, AppEvent::Halted { purged: 4 });
        let event = outcome_event(Outcome::StepRefused(Event::DoorStepOpen));
        assert_eq!(event, AppEvent::StepRefused(Event::DoorStepOpen));
    }

    #[test]
    fn new_service_is_in_power_on_state() {
        let q = EventQueue::new();
        let s = SharedState::new();
        let svc = DoorService::new(&q, &s, SystemConfig::default(), 0);
        assert_eq!(svc.door_status(), DoorStatus::Closed);
        assert_eq!(svc.dial_value(), 5);
        assert_eq!(svc.servo_angle(), 0);
        assert_eq!(svc.token(), None);
        assert!(q.is_empty());
    }
}
