//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IrrigationController (domain)
//! ```
//!
//! Driven adapters (moisture probe, pump relay, alert listeners) implement
//! these traits. The [`IrrigationController`](super::controller::IrrigationController)
//! receives them at construction, so the domain core never touches
//! hardware directly.

use crate::error::{ActuatorError, Error, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to poll the moisture probe.
pub trait SensorPort {
    /// Read the probe's current raw value. Implementations must not cache.
    fn read_moisture(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Logical level of the pump output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Off,
    On,
}

impl PumpState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Write-side port: the domain calls this to drive the pump output.
pub trait ActuatorPort {
    /// Drive the pump output to `state`.
    fn set_pump(&mut self, state: PumpState) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Alert listener port (driven adapter: domain → logging / UI)
// ───────────────────────────────────────────────────────────────

/// Receives the payload-free "alert" notification raised when a flow
/// check finds the soil still dry.
///
/// Any `FnMut()` closure is a listener.
pub trait AlertListener {
    fn on_alert(&mut self);
}

impl<F: FnMut()> AlertListener for F {
    fn on_alert(&mut self) {
        self()
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from loading or validating a [`ControllerConfig`](crate::config::ControllerConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document could not be deserialised.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
