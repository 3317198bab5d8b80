//! GarageDoor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod interrupts;
pub mod remote;
pub mod scheduler;
pub mod shared;

pub mod pins;

// Hardware-facing layers; on host builds they fall back to simulation.
pub mod adapters;
pub mod drivers;
