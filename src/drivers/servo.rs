//! Hobby servo driver (SG90) on LEDC PWM.
//!
//! 50 Hz frame; the pulse width maps linearly from 500 µs at 0° to
//! 2500 µs at 180°.  Angles outside that range are clamped.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init helpers.
//! On host/test: tracks the commanded angle in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub const MAX_ANGLE: i32 = 180;

/// Pulse width in microseconds for `angle` degrees (clamped to 0–180).
pub fn pulse_width_us(angle: i32) -> u32 {
    let angle = angle.clamp(0, MAX_ANGLE) as u32;
    let span = pins::SERVO_MAX_PULSE_US - pins::SERVO_MIN_PULSE_US;
    pins::SERVO_MIN_PULSE_US + span * angle / MAX_ANGLE as u32
}

/// LEDC duty for a pulse width at the configured frequency and resolution.
pub fn duty_for_pulse(pulse_us: u32) -> u32 {
    let period_us = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;
    let full_scale = (1u32 << pins::SERVO_PWM_RESOLUTION_BITS) - 1;
    (u64::from(pulse_us) * u64::from(full_scale) / u64::from(period_us)) as u32
}

pub struct ServoDriver {
    angle: i32,
    writes: u32,
}

impl Default for ServoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoDriver {
    /// Starts at 0° (door closed).  Nothing is written until the first
    /// [`set_angle`](Self::set_angle).
    pub fn new() -> Self {
        Self { angle: 0, writes: 0 }
    }

    pub fn set_angle(&mut self, angle: i32) {
        let clamped = angle.clamp(0, MAX_ANGLE);
        if clamped != angle {
            log::warn!("servo: angle {} clamped to {}", angle, clamped);
        }
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, duty_for_pulse(pulse_width_us(clamped)));
        self.angle = clamped;
        self.writes = self.writes.wrapping_add(1);
    }

    /// Last commanded angle.
    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Number of position writes since construction.
    pub fn writes(&self) -> u32 {
        self.writes
    }
}
