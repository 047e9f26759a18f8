//! Irrigation Firmware — Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  HardwareAdapter        LogAlertListener   MonotonicClock│
//! │  (Sensor+Actuator)      (AlertListener)    (loop timing) │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │        IrrigationController (pure logic)           │  │
//! │  │   pump · flow check · watering schedule · alerts   │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::Result;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use irrigation::adapters::hardware::HardwareAdapter;
use irrigation::adapters::log_sink::LogAlertListener;
use irrigation::adapters::time::MonotonicClock;
use irrigation::app::controller::IrrigationController;
use irrigation::config::ControllerConfig;
use irrigation::drivers::pump::PumpDriver;
use irrigation::error::Error;
use irrigation::pins;
use irrigation::sensors::moisture::MoistureSensor;

/// Optional JSON config baked in at build time.
const BOARD_CONFIG_JSON: Option<&str> = option_env!("IRRIGATION_CONFIG_JSON");

/// How often the main loop logs a moisture reading.
const REPORT_INTERVAL: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Irrigation controller v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match BOARD_CONFIG_JSON {
        Some(json) => ControllerConfig::from_json(json).map_err(Error::from)?,
        None => ControllerConfig::default(),
    };

    // ── 3. Peripherals ────────────────────────────────────────
    // Any failure here is fatal: without both handles there is nothing
    // to control.
    let peripherals = Peripherals::take()?;

    // Pump relay on GPIO16, moisture probe on ADC1 channel 1 (GPIO2).
    // Keep in step with `pins`.
    let pump_pin = PinDriver::output(peripherals.pins.gpio16)?;
    let adc = AdcDriver::new(peripherals.adc1)?;
    let adc_config = AdcChannelConfig {
        attenuation: DB_11,
        ..Default::default()
    };
    let probe = AdcChannelDriver::new(&adc, peripherals.pins.gpio2, &adc_config)?;

    let hw = HardwareAdapter::new(
        MoistureSensor::new(probe, pins::MOISTURE_ADC_CHANNEL),
        PumpDriver::new(pump_pin).map_err(Error::from)?,
    );

    info!(
        "Pump on GPIO{}, moisture probe on ADC1 channel {}",
        pins::PUMP_GPIO,
        pins::MOISTURE_ADC_CHANNEL
    );

    // ── 4. Controller ─────────────────────────────────────────
    let mut controller = IrrigationController::new(hw, config)?;
    controller.init(&());
    controller.subscribe(LogAlertListener::new())?;

    // ── 5. Main loop ──────────────────────────────────────────
    let tick = controller.config().control_loop_interval();
    let mut clock = MonotonicClock::new();
    let mut last_report = controller.now();

    loop {
        std::thread::sleep(tick);
        controller.advance(clock.lap());

        if controller.now().saturating_sub(last_report) >= REPORT_INTERVAL {
            last_report = controller.now();
            match controller.read_moisture() {
                Ok(value) => info!(
                    "moisture={} pump={:?} pending_timers={}",
                    value,
                    controller.pump_state(),
                    controller.pending_timers()
                ),
                Err(e) => warn!("Moisture read failed: {}", e),
            }
        }
    }
}
