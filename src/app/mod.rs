//! Application core — pure control logic, zero I/O.
//!
//! The supervisory loop of the node: connectivity tracking, telemetry
//! sampling, contact dispatch, and indicator arbitration. All interaction
//! with the stack and hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
