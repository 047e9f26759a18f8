//! Sensor drivers.
//!
//! The controller has a single probe; further sensors would sit beside it.

pub mod moisture;
