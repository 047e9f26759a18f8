//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the moisture probe and the pump relay, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On host targets it is built over
//! [`SimAdc`](crate::sensors::moisture::SimAdc) and any `embedded-hal`
//! output pin.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ActuatorPort, PumpState, SensorPort};
use crate::drivers::pump::PumpDriver;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::moisture::{AnalogRead, MoistureSensor};

/// Concrete adapter that combines the probe and the pump behind port traits.
pub struct HardwareAdapter<P, A> {
    moisture: MoistureSensor<A>,
    pump: PumpDriver<P>,
}

impl<P: OutputPin, A: AnalogRead> HardwareAdapter<P, A> {
    pub fn new(moisture: MoistureSensor<A>, pump: PumpDriver<P>) -> Self {
        Self { moisture, pump }
    }

    pub fn pump(&self) -> &PumpDriver<P> {
        &self.pump
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin, A: AnalogRead> SensorPort for HardwareAdapter<P, A> {
    fn read_moisture(&mut self) -> Result<u16, SensorError> {
        self.moisture.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin, A: AnalogRead> ActuatorPort for HardwareAdapter<P, A> {
    fn set_pump(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        self.pump.set(state)
    }
}
