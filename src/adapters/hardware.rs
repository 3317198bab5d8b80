//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the servo and LCD drivers, exposing them through [`ActuatorPort`]
//! and [`DisplayPort`], and provides the blocking settle delay through
//! [`DelayNs`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs and the delay is recorded, not slept.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, DisplayPort};
use crate::drivers::lcd::LcdDriver;
use crate::drivers::servo::ServoDriver;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    servo: ServoDriver,
    lcd: LcdDriver,
    #[cfg(not(target_os = "espidf"))]
    delayed_ns: u64,
}

impl HardwareAdapter {
    pub fn new(servo: ServoDriver, lcd: LcdDriver) -> Self {
        Self {
            servo,
            lcd,
            #[cfg(not(target_os = "espidf"))]
            delayed_ns: 0,
        }
    }

    pub fn servo(&self) -> &ServoDriver {
        &self.servo
    }

    pub fn lcd(&self) -> &LcdDriver {
        &self.lcd
    }

    /// Total simulated delay (host builds only).
    #[cfg(not(target_os = "espidf"))]
    pub fn delayed_ms(&self) -> u64 {
        self.delayed_ns / 1_000_000
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_position(&mut self, angle_degrees: i32) {
        self.servo.set_angle(angle_degrees);
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn show_lines(&mut self, line0: &str, line1: &str) {
        self.lcd.show_lines(line0, line1);
    }
}

// ── Settle delay ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl DelayNs for HardwareAdapter {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_svc::hal::delay::FreeRtos.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for HardwareAdapter {
    fn delay_ns(&mut self, ns: u32) {
        self.delayed_ns += u64::from(ns);
    }
}
