//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the AirGuard monitor:
//! gas sampling orchestration, alert arbitration, and command handling.
//! Sensor input arrives through the **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
