//! System configuration parameters
//!
//! All tunable parameters for the garage door controller.
//! Configuration is volatile: it is built from defaults at boot, with the
//! Wi-Fi credentials and remote store address baked in at build time.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum SSID length (IEEE 802.11).
pub const SSID_MAX_LEN: usize = 32;
/// Maximum WPA2 passphrase length.
pub const PASSWORD_MAX_LEN: usize = 64;
/// Maximum remote store base URL length.
pub const URL_MAX_LEN: usize = 96;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Dial ---
    /// Dial value with the door fully open
    pub dial_min: i32,
    /// Dial value with the door fully closed
    pub dial_max: i32,
    /// Percentage shown per dial unit
    pub dial_step_percent: i32,

    // --- Actuator ---
    /// Servo travel between fully closed and fully open (degrees)
    pub servo_span_degrees: i32,
    /// Time the dispatch loop waits after each servo step (milliseconds)
    pub step_settle_ms: u32,

    // --- Inputs ---
    /// Minimum gap between two accepted encoder rotation edges (milliseconds)
    pub rotation_debounce_ms: u32,

    // --- Remote link ---
    /// Token rotation period (milliseconds)
    pub token_rotation_interval_ms: u32,
    /// Remote command poll period (milliseconds)
    pub command_poll_interval_ms: u32,
    /// Tokens are drawn in `0..token_modulus`
    pub token_modulus: u32,

    // --- Network ---
    pub wifi_ssid: String<SSID_MAX_LEN>,
    pub wifi_password: String<PASSWORD_MAX_LEN>,
    /// Base URL of the remote key-value store (no trailing slash)
    pub remote_base_url: String<URL_MAX_LEN>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Dial
            dial_min: 0,
            dial_max: 5,
            dial_step_percent: 20,

            // Actuator
            servo_span_degrees: 180,
            step_settle_ms: 1000,

            // Inputs
            rotation_debounce_ms: 1000,

            // Remote link
            token_rotation_interval_ms: 30_000,
            command_poll_interval_ms: 15_000,
            token_modulus: 100,

            // Network (build-time, empty when unset)
            wifi_ssid: build_env(option_env!("GARAGEDOOR_WIFI_SSID")),
            wifi_password: build_env(option_env!("GARAGEDOOR_WIFI_PASSWORD")),
            remote_base_url: build_env(option_env!("GARAGEDOOR_REMOTE_URL")),
        }
    }
}

impl SystemConfig {
    /// Servo degrees covered by one dial unit.
    pub fn step_degrees(&self) -> i32 {
        self.servo_span_degrees / (self.dial_max - self.dial_min)
    }

    /// Number of dial units between fully open and fully closed.
    pub fn dial_span(&self) -> i32 {
        self.dial_max - self.dial_min
    }

    /// Reject inconsistent values instead of clamping them.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.dial_min < 0 || self.dial_min >= self.dial_max {
            return Err("dial range must satisfy 0 <= dial_min < dial_max");
        }
        // A full burst plus its status/sync/marker events must fit the queue.
        if self.dial_span() + 3 > crate::events::EVENT_QUEUE_CAP as i32 {
            return Err("dial range too large for the event queue");
        }
        if self.servo_span_degrees <= 0 || self.servo_span_degrees > 180 {
            return Err("servo span must be within 1..=180 degrees");
        }
        if self.servo_span_degrees % self.dial_span() != 0 {
            return Err("servo span must divide evenly into dial steps");
        }
        if self.dial_step_percent <= 0 || self.dial_step_percent * self.dial_max > 999 {
            return Err("dial percentage must fit three digits");
        }
        if self.token_rotation_interval_ms == 0 || self.command_poll_interval_ms == 0 {
            return Err("remote periods must be non-zero");
        }
        if self.token_modulus == 0 {
            return Err("token modulus must be non-zero");
        }
        Ok(())
    }
}

/// Copy a build-time string into a fixed-capacity field, empty if unset
/// or too long.
fn build_env<const N: usize>(value: Option<&'static str>) -> String<N> {
    let mut out = String::new();
    if let Some(v) = value {
        if out.push_str(v).is_err() {
            out.clear();
        }
    }
    out
}
