//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the irrigation rules: pump switching, the deferred
//! flow check, and the optional watering schedule. All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod controller;
pub mod events;
pub mod ports;
