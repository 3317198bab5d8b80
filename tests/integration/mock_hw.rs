//! Mock adapters for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real GPIO/PWM registers or the network.

use std::collections::{HashMap, VecDeque};

use embedded_hal::delay::DelayNs;
use garagedoor::app::events::AppEvent;
use garagedoor::app::ports::{
    ActuatorPort, DisplayPort, EventSink, RemoteStorePort, TokenSource,
};
use garagedoor::app::service::{DoorService, Step};
use garagedoor::config::SystemConfig;
use garagedoor::error::{Error, RemoteError};
use garagedoor::events::EventQueue;
use garagedoor::interrupts::InputBridge;
use garagedoor::remote::RemoteKey;
use garagedoor::remote::wire::{self, Value};
use garagedoor::shared::SharedState;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Position(i32),
    Screen(String, String),
    Settle(u32),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn positions(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Position(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn last_screen(&self) -> Option<(String, String)> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Screen(l0, l1) => Some((l0.clone(), l1.clone())),
            _ => None,
        })
    }

    pub fn settled_ms(&self) -> u32 {
        self.calls
            .iter()
            .map(|c| match c {
                HwCall::Settle(ms) => *ms,
                _ => 0,
            })
            .sum()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn set_position(&mut self, angle_degrees: i32) {
        self.calls.push(HwCall::Position(angle_degrees));
    }
}

impl DisplayPort for MockHardware {
    fn show_lines(&mut self, line0: &str, line1: &str) {
        self.calls
            .push(HwCall::Screen(line0.to_string(), line1.to_string()));
    }
}

impl DelayNs for MockHardware {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(HwCall::Settle(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(HwCall::Settle(ms));
    }
}

// ── MockRemote ────────────────────────────────────────────────

pub struct MockRemote {
    store: HashMap<RemoteKey, String>,
    pub puts: Vec<(RemoteKey, String)>,
    pub available: bool,
}

#[allow(dead_code)]
impl MockRemote {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            puts: Vec::new(),
            available: true,
        }
    }

    /// What the companion app would see for `key`.
    pub fn value(&self, key: RemoteKey) -> &str {
        self.store.get(&key).map_or("", String::as_str)
    }

    /// Write from the app side (does not count as a device put).
    pub fn app_writes(&mut self, key: RemoteKey, raw: &str) {
        self.store.insert(key, raw.to_string());
    }

    /// Every value the device published under `key`, oldest first.
    pub fn history(&self, key: RemoteKey) -> Vec<&str> {
        self.puts
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStorePort for MockRemote {
    fn put(&mut self, key: RemoteKey, value: &str) -> Result<(), RemoteError> {
        if !self.available {
            return Err(RemoteError::Unavailable);
        }
        self.store.insert(key, value.to_string());
        self.puts.push((key, value.to_string()));
        Ok(())
    }

    fn get(&mut self, key: RemoteKey) -> Result<Value, RemoteError> {
        if !self.available {
            return Err(RemoteError::Unavailable);
        }
        wire::value(self.value(key))
    }
}

// ── FixedTokens ───────────────────────────────────────────────

/// Hands out scripted entropy, then zeros.
pub struct FixedTokens(pub VecDeque<u32>);

impl FixedTokens {
    pub fn new(values: &[u32]) -> Self {
        Self(values.iter().copied().collect())
    }
}

impl TokenSource for FixedTokens {
    fn next_token(&mut self) -> u32 {
        self.0.pop_front().unwrap_or(0)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// A started service plus its mocks.
///
/// The queue and shared state are leaked so the service (which borrows
/// them, like the firmware borrows its statics) can live in the same
/// struct.
pub struct Rig {
    pub queue: &'static EventQueue,
    pub shared: &'static SharedState,
    pub inputs: InputBridge<'static>,
    pub svc: DoorService<'static>,
    pub hw: MockHardware,
    pub remote: MockRemote,
    pub tokens: FixedTokens,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(tokens: &[u32]) -> Self {
        Self::with_remote(tokens, MockRemote::new())
    }

    pub fn with_remote(tokens: &[u32], mut remote: MockRemote) -> Self {
        let queue: &'static EventQueue = Box::leak(Box::new(EventQueue::new()));
        let shared: &'static SharedState = Box::leak(Box::new(SharedState::new()));
        let mut sink = RecordingSink::new();
        let mut svc = DoorService::new(queue, shared, SystemConfig::default(), 0);
        svc.start(&mut remote, &mut sink).unwrap();
        Self {
            queue,
            shared,
            inputs: InputBridge::new(shared, queue),
            svc,
            hw: MockHardware::new(),
            remote,
            tokens: FixedTokens::new(tokens),
            sink,
        }
    }

    pub fn step(&mut self, now_ms: u32) -> Result<Step, Error> {
        self.svc.step(
            now_ms,
            &mut self.hw,
            &mut self.remote,
            &mut self.tokens,
            &mut self.sink,
        )
    }

    /// Dispatch until the queue is empty, without running idle tasks.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while !self.queue.is_empty() {
            self.step(0).unwrap();
            n += 1;
            assert!(n < 1_000, "queue never drained");
        }
        n
    }
}
