//! GPIO / peripheral pin assignments for the garage door controller board
//! (ESP32 DevKit).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Touch sensor (TTP223 capacitive pad, active HIGH)
// ---------------------------------------------------------------------------

/// Rising edge = touch.
pub const TOUCH_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Rotary encoder (KY-040)
// ---------------------------------------------------------------------------

/// Push-button, rising edge toggles dial mode.
pub const ENCODER_BUTTON_GPIO: i32 = 21;
/// Clock line, falling edge = one detent.
pub const ENCODER_CLK_GPIO: i32 = 22;
/// Data line, sampled on the CLK edge for direction.
pub const ENCODER_DAT_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit parallel)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 4;
/// Held LOW: the driver only writes.
pub const LCD_RW_GPIO: i32 = 0;
pub const LCD_EN_GPIO: i32 = 16;
pub const LCD_D4_GPIO: i32 = 17;
pub const LCD_D5_GPIO: i32 = 5;
pub const LCD_D6_GPIO: i32 = 18;
pub const LCD_D7_GPIO: i32 = 19;

/// Data pins in nibble order (bit 0 → D4).
pub const LCD_DATA_GPIOS: [i32; 4] = [LCD_D4_GPIO, LCD_D5_GPIO, LCD_D6_GPIO, LCD_D7_GPIO];

pub const LCD_COLS: u8 = 8;
pub const LCD_ROWS: u8 = 2;

// ---------------------------------------------------------------------------
// Servo (SG90 hobby servo)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the door servo.
pub const SERVO_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC timer resolution (bits).  14-bit gives ~1.2 µs per duty step at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Pulse width at 0°.
pub const SERVO_MIN_PULSE_US: u32 = 500;
/// Pulse width at 180°.
pub const SERVO_MAX_PULSE_US: u32 = 2500;
