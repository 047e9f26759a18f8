//! GPIO / ADC channel assignments for the irrigation controller board.
//!
//! Fixed by the board wiring, so not part of the runtime configuration.
//! The firmware entry point binds the matching peripherals.

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

/// Digital output driving the pump relay. HIGH = pump running.
pub const PUMP_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Soil moisture probe (resistive, analog)
// ---------------------------------------------------------------------------

/// ADC1 channel the moisture probe is wired to.
pub const MOISTURE_ADC_CHANNEL: u8 = 1;
