//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Each record carries a subsystem tag: `DOOR`, `DIAL`, `REMOTE` or `QUEUE`.

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { status, dial_value } => {
                info!("DOOR | started status={:?} dial={}", status, dial_value);
            }
            AppEvent::DoorStatusChanged { from, to } => {
                info!("DOOR | {:?} -> {:?}", from, to);
            }
            AppEvent::StepExecuted {
                event,
                dial_value,
                servo_angle,
            } => {
                info!(
                    "DOOR | {:?} dial={} servo={}\u{00b0}",
                    event, dial_value, servo_angle
                );
            }
            AppEvent::StepRefused(event) => {
                warn!("DOOR | {:?} refused at dial bound", event);
            }
            AppEvent::Halted { purged } => {
                info!("DOOR | halted, {} pending event(s) purged", purged);
            }
            AppEvent::DialModeChanged(mode) => {
                info!("DIAL | mode={:?}", mode);
            }
            AppEvent::TokenIssued(token) => {
                info!("REMOTE | token={}", token);
            }
            AppEvent::CommandAccepted(intent) => {
                info!("REMOTE | command accepted: {:?}", intent);
            }
            AppEvent::CommandRejected(rejection) => {
                warn!("REMOTE | command rejected: {}", rejection);
            }
            AppEvent::CommandMalformed(e) => {
                warn!("REMOTE | malformed command: {}", e);
            }
            AppEvent::RemoteUnavailable { key, error } => {
                warn!("REMOTE | {} failed: {}", key, error);
            }
            AppEvent::QueueOverflow { dropped } => {
                warn!("QUEUE | full, {} event(s) dropped", dropped);
            }
            AppEvent::HandlerFailed { event, error } => {
                error!("QUEUE | handler for {:?} failed: {}", event, error);
            }
        }
    }
}
