//! ESP-IDF peripheral bindings.
//!
//! The pump relay needs nothing here: `esp_idf_hal::gpio::PinDriver` in
//! output mode already implements `embedded_hal::digital::OutputPin`.
//! The oneshot ADC channel driver gets an [`AnalogRead`] impl so it can
//! sit under [`MoistureSensor`](crate::sensors::moisture::MoistureSensor).

use std::borrow::Borrow;

use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::gpio::ADCPin;
use esp_idf_svc::sys::EspError;

use crate::sensors::moisture::AnalogRead;

impl<'d, T, M> AnalogRead for AdcChannelDriver<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    type Error = EspError;

    fn read_raw(&mut self) -> Result<u16, EspError> {
        self.read()
    }
}
