//! GPIO / peripheral pin assignments for the DoorSense main board.
//!
//! Single source of truth — every adapter references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Contact input (hall-effect sensor, open-drain, external pull-up)
// ---------------------------------------------------------------------------

/// Hall-sensor output. Logical HIGH = magnet present = contact closed.
pub const CONTACT_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Network indicator LED (single colour, active-high)
// ---------------------------------------------------------------------------

pub const INDICATOR_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button: press = user activity, release = identify.
pub const BUTTON_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Battery monitoring (ADC1)
// ---------------------------------------------------------------------------

/// Battery rail divider tap. ADC1 channel 0 (GPIO 1 on ESP32-C6).
pub const BATTERY_ADC_GPIO: i32 = 1;

// ---------------------------------------------------------------------------
// I²C bus (temperature/humidity sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 6;
pub const I2C_SCL_GPIO: i32 = 7;
