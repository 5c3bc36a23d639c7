//! GPIO pin identifiers and the default shade board wiring.
//!
//! Single source of truth for the reference board: [`ShadeConfig::default`]
//! references these constants rather than hard-coding pin numbers.
//!
//! [`ShadeConfig::default`]: crate::config::ShadeConfig

/// Board-level GPIO number.
pub type PinId = u8;

/// Convert a raw pin number from a legacy board description into an
/// optional pin.
///
/// Legacy descriptions use `0` to mean "no switch fitted".  That value is
/// also a valid GPIO on most boards, so a switch wired to GPIO 0 cannot be
/// expressed through this path; use `Some(0)` in a [`ShadeConfig`] instead.
///
/// [`ShadeConfig`]: crate::config::ShadeConfig
pub const fn pin_from_raw(raw: u8) -> Option<PinId> {
    if raw == 0 { None } else { Some(raw) }
}

// ---------------------------------------------------------------------------
// Limit switches (reed or micro-switch to GND, internal pull-up)
// ---------------------------------------------------------------------------

/// Digital input: shade fully open.
pub const OPEN_SWITCH_GPIO: PinId = 4;
/// Digital input: shade fully closed.
pub const CLOSE_SWITCH_GPIO: PinId = 5;

// ---------------------------------------------------------------------------
// Motor driver (L298N-style H-bridge)
// ---------------------------------------------------------------------------

/// Digital output: IN1, HIGH drives the shade towards open.
pub const MOTOR_OPEN_GPIO: PinId = 12;
/// Digital output: IN2, HIGH drives the shade towards closed.
pub const MOTOR_CLOSE_GPIO: PinId = 13;
/// LEDC PWM output: ENA, motor speed.
pub const MOTOR_PWM_GPIO: PinId = 14;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0..=255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the motor enable line (25 kHz, inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
