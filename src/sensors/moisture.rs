//! Resistive soil-moisture probe driver.
//!
//! The probe is read through one ADC channel fixed at construction. The
//! driver returns the raw integer reading untouched and keeps no history:
//! every [`read`](MoistureSensor::read) goes back to the converter.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the oneshot ADC channel driver implements [`AnalogRead`]
//! (see `adapters::esp`).
//! On host/test: [`SimAdc`] reads from a shared atomic for injection.

use core::fmt::Debug;
use core::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use log::error;

use crate::error::SensorError;

/// One-shot analog conversion on a single, already-configured channel.
pub trait AnalogRead {
    type Error: Debug;

    fn read_raw(&mut self) -> Result<u16, Self::Error>;
}

pub struct MoistureSensor<A> {
    adc: A,
    channel: u8,
}

impl<A: AnalogRead> MoistureSensor<A> {
    pub fn new(adc: A, channel: u8) -> Self {
        Self { adc, channel }
    }

    pub fn read(&mut self) -> Result<u16, SensorError> {
        self.adc.read_raw().map_err(|e| {
            error!("Moisture: ADC channel {} read failed: {:?}", self.channel, e);
            SensorError::AdcReadFailed
        })
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }
}

/// Simulated converter for host builds. Clones share one value, so a test
/// or simulation keeps a handle and moves the other into the sensor.
#[derive(Debug, Clone, Default)]
pub struct SimAdc {
    raw: Arc<AtomicU16>,
}

impl SimAdc {
    pub fn new(initial: u16) -> Self {
        Self {
            raw: Arc::new(AtomicU16::new(initial)),
        }
    }

    pub fn set(&self, raw: u16) {
        self.raw.store(raw, Ordering::Relaxed);
    }
}

impl AnalogRead for SimAdc {
    type Error = core::convert::Infallible;

    fn read_raw(&mut self) -> Result<u16, Self::Error> {
        Ok(self.raw.load(Ordering::Relaxed))
    }
}
