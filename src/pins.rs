//! GPIO / peripheral pin assignments for the irrigation controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers or PWM timing.

// ---------------------------------------------------------------------------
// Soil moisture probe (comparator output)
// ---------------------------------------------------------------------------

/// Digital input: HIGH = soil dry, LOW = soil wet.
pub const SOIL_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Servo (rotary actuator)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the hobby servo signal line.
pub const SERVO_PWM_GPIO: i32 = 5;
/// Standard hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// 14-bit resolution keeps the 2–12 % pulse range fine-grained at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

// ---------------------------------------------------------------------------
// Piezo buzzer (tone actuator)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the buzzer.
pub const BUZZER_PWM_GPIO: i32 = 6;
/// Initial buzzer frequency before the first melody step (A4).
pub const BUZZER_BASE_FREQ_HZ: u32 = 440;
pub const BUZZER_PWM_RESOLUTION_BITS: u32 = 10;

// ---------------------------------------------------------------------------
// Water valve relay
// ---------------------------------------------------------------------------

/// Digital output: HIGH energises the valve/pump supply relay.
pub const VALVE_RELAY_GPIO: i32 = 7;
