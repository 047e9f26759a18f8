//! Pump relay driver.
//!
//! The pump is switched by a single digital output. Holding an
//! [`OutputPin`] means the pin was configured as an output when the HAL
//! handed it over, and it cannot be reconfigured through this driver, so
//! the direction stays output for the driver's lifetime.
//!
//! ## Safety contract
//!
//! This driver is a dumb actuator. It has no feedback: a successful write
//! means the level was set, not that water is moving.

use embedded_hal::digital::{OutputPin, PinState};
use log::error;

use crate::app::ports::PumpState;
use crate::error::ActuatorError;

pub struct PumpDriver<P> {
    pin: P,
    state: PumpState,
}

impl<P: OutputPin> PumpDriver<P> {
    /// Take ownership of the pump pin and drive it low, so the logical
    /// state starts from a known OFF regardless of reset level.
    pub fn new(mut pin: P) -> Result<Self, ActuatorError> {
        pin.set_low().map_err(|e| {
            error!("Pump: initial set_low failed: {:?}", e);
            ActuatorError::GpioWriteFailed
        })?;
        Ok(Self {
            pin,
            state: PumpState::Off,
        })
    }

    pub fn set(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        let level = PinState::from(state.is_on());
        self.pin.set_state(level).map_err(|e| {
            error!("Pump: write {:?} failed: {:?}", state, e);
            ActuatorError::GpioWriteFailed
        })?;
        self.state = state;
        Ok(())
    }

    /// Last level successfully written.
    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_on()
    }
}
