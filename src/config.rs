//! Controller configuration parameters
//!
//! All tunable parameters for the irrigation controller. Values can be
//! overridden from a JSON document (provisioning, host simulation).

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Longest single watering run a schedule may request (seconds).
pub const MAX_WATERING_SECS: u32 = 300;

/// Fixed-interval watering plan (no moisture feedback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WateringSchedule {
    /// Seconds between the start of consecutive runs.
    pub interval_secs: u32,
    /// Seconds the pump stays on per run.
    pub duration_secs: u32,
}

impl WateringSchedule {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::ValidationFailed("watering duration must be > 0"));
        }
        if self.duration_secs > MAX_WATERING_SECS {
            return Err(ConfigError::ValidationFailed("watering duration exceeds limit"));
        }
        if self.duration_secs >= self.interval_secs {
            return Err(ConfigError::ValidationFailed(
                "watering duration must be shorter than its interval",
            ));
        }
        Ok(())
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    // --- Flow check ---
    /// Delay between turn-on and the flow check (seconds)
    pub flow_check_delay_secs: u32,
    /// Delay between the flow check and the moisture read (seconds)
    pub moisture_verify_delay_secs: u32,
    /// Readings strictly below this raise an alert
    pub moisture_alert_threshold: u16,
    /// Cancel still-pending flow checks when the pump is turned on again
    pub cancel_superseded_checks: bool,

    // --- Timing ---
    /// Main loop interval (milliseconds)
    pub control_loop_interval_ms: u32,

    // --- Schedule ---
    /// Optional fixed watering plan
    pub watering: Option<WateringSchedule>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            flow_check_delay_secs: 10,
            moisture_verify_delay_secs: 2,
            moisture_alert_threshold: 1,
            cancel_superseded_checks: false,

            control_loop_interval_ms: 100, // 10 Hz

            watering: None,
        }
    }
}

impl ControllerConfig {
    /// Parse a JSON document and validate it. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flow_check_delay_secs == 0 {
            return Err(ConfigError::ValidationFailed("flow_check_delay_secs must be > 0"));
        }
        if self.moisture_verify_delay_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "moisture_verify_delay_secs must be > 0",
            ));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("control_loop_interval_ms must be > 0"));
        }
        match &self.watering {
            Some(plan) => plan.validate(),
            None => Ok(()),
        }
    }

    pub fn flow_check_delay(&self) -> Duration {
        Duration::from_secs(self.flow_check_delay_secs.into())
    }

    pub fn moisture_verify_delay(&self) -> Duration {
        Duration::from_secs(self.moisture_verify_delay_secs.into())
    }

    pub fn control_loop_interval(&self) -> Duration {
        Duration::from_millis(self.control_loop_interval_ms.into())
    }
}
