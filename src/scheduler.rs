//! Idle-time task scheduler.
//!
//! When the event queue is empty the dispatch loop hands control to the
//! scheduler, which runs the time-gated remote tasks.  The scheduler only
//! decides *when*; a [`SchedulerDelegate`] decides *what* each task does.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Idle pass (queue empty)                 │
//! │                                                              │
//! │  ┌────────────────────────┐    ┌────────────────────────┐    │
//! │  │ TokenRotation          │    │ CommandPoll            │    │
//! │  │ every 30 s, or now if  │    │ every 15 s             │    │
//! │  │ no live token          │    │                        │    │
//! │  └───────────┬────────────┘    └───────────┬────────────┘    │
//! │              ▼                             ▼                 │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate                         │  │
//! │  │   (publishes token / fetches and queues command)       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks are non-blocking comparisons against a millisecond clock that
//! wraps at `u32::MAX`.

use log::debug;

use crate::app::ports::{IdleTask, SchedulerDelegate};
use crate::config::SystemConfig;

/// One periodic task.
#[derive(Debug, Clone, Copy)]
struct Gate {
    task: IdleTask,
    period_ms: u32,
    /// When the task last ran (ms since boot).
    last_ms: u32,
    runs: u32,
}

impl Gate {
    fn elapsed(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_ms) > self.period_ms
    }
}

/// Runs the idle tasks in a fixed order: token rotation, then command poll.
pub struct Scheduler {
    gates: [Gate; 2],
}

impl Scheduler {
    /// Both periods start counting at `now_ms`.
    pub fn new(config: &SystemConfig, now_ms: u32) -> Self {
        Self {
            gates: [
                Gate {
                    task: IdleTask::TokenRotation,
                    period_ms: config.token_rotation_interval_ms,
                    last_ms: now_ms,
                    runs: 0,
                },
                Gate {
                    task: IdleTask::CommandPoll,
                    period_ms: config.command_poll_interval_ms,
                    last_ms: now_ms,
                    runs: 0,
                },
            ],
        }
    }

    /// One idle pass.  Runs every task whose period has elapsed, or that
    /// the delegate wants right away.  Returns the number of tasks run.
    pub fn poll(&mut self, now_ms: u32, delegate: &mut dyn SchedulerDelegate) -> usize {
        let mut ran = 0;
        for gate in &mut self.gates {
            if gate.elapsed(now_ms) || delegate.wants_now(gate.task) {
                debug!("Scheduler: {:?} due at {} ms", gate.task, now_ms);
                delegate.run_idle_task(gate.task);
                gate.last_ms = now_ms;
                gate.runs = gate.runs.wrapping_add(1);
                ran += 1;
            }
        }
        ran
    }

    /// How many times `task` has run.
    pub fn runs(&self, task: IdleTask) -> u32 {
        self.gates
            .iter()
            .find(|g| g.task == task)
            .map_or(0, |g| g.runs)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Test delegate that records task runs.
    struct RecordingDelegate {
        runs: Vec<IdleTask>,
        urgent: Option<IdleTask>,
    }

    impl RecordingDelegate {
        fn new() -> Self {
            Self {
                runs: Vec::new(),
                urgent: None,
            }
        }
    }

    impl SchedulerDelegate for RecordingDelegate {
        fn run_idle_task(&mut self, task: IdleTask) {
            self.runs.push(task);
            if self.urgent == Some(task) {
                self.urgent = None;
            }
        }

        fn wants_now(&self, task: IdleTask) -> bool {
            self.urgent == Some(task)
        }
    }

    #[test]
    fn nothing_runs_before_period() {
        let mut sched = Scheduler::new(&SystemConfig::default(), 0);
        let mut delegate = RecordingDelegate::new();

        assert_eq!(sched.poll(15_000, &mut delegate), 0);
        assert!(delegate.runs.is_empty());
    }

    #[test]
    fn command_poll_every_fifteen_seconds() {
        let mut sched = Scheduler::new(&SystemConfig::default(), 0);
        let mut delegate = RecordingDelegate::new();

        sched.poll(15_001, &mut delegate);
        assert_eq!(delegate.runs, vec![IdleTask::CommandPoll]);

        sched.poll(30_000, &mut delegate);
        assert_eq!(delegate.runs.len(), 1);
        sched.poll(30_002, &mut delegate);
        assert_eq!(sched.runs(IdleTask::CommandPoll), 2);
    }

    #[test]
    fn both_tasks_run_in_order() {
        let mut sched = Scheduler::new(&SystemConfig::default(), 0);
        let mut delegate = RecordingDelegate::new();

        sched.poll(30_001, &mut delegate);
        assert_eq!(
            delegate.runs,
            vec![IdleTask::TokenRotation, IdleTask::CommandPoll]
        );
    }

    #[test]
    fn delegate_can_pull_a_task_forward() {
        let mut sched = Scheduler::new(&SystemConfig::default(), 0);
        let mut delegate = RecordingDelegate::new();
        delegate.urgent = Some(IdleTask::TokenRotation);

        sched.poll(10, &mut delegate);
        assert_eq!(delegate.runs, vec![IdleTask::TokenRotation]);

        // The period restarts from the early run.
        sched.poll(30_005, &mut delegate);
        assert_eq!(sched.runs(IdleTask::TokenRotation), 1);
        sched.poll(30_011, &mut delegate);
        assert_eq!(sched.runs(IdleTask::TokenRotation), 2);
    }

    #[test]
    fn survives_clock_wrap() {
        let start = u32::MAX - 1_000;
        let mut sched = Scheduler::new(&SystemConfig::default(), start);
        let mut delegate = RecordingDelegate::new();

        sched.poll(start.wrapping_add(15_001), &mut delegate);
        assert_eq!(delegate.runs, vec![IdleTask::CommandPoll]);
    }
}
