//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to                  |
//! |-------------|---------------------|------------------------------|
//! | `hardware`  | SensorPort          | Moisture probe (ADC)         |
//! |             | ActuatorPort        | Pump relay (GPIO)            |
//! | `log_sink`  | AlertListener       | Serial log output            |
//! | `time`      | —                   | Monotonic system timer       |
//! | `esp`       | AnalogRead          | ESP-IDF oneshot ADC          |

#[cfg(all(feature = "espidf", target_os = "espidf"))]
pub mod esp;
pub mod hardware;
pub mod log_sink;
pub mod time;
