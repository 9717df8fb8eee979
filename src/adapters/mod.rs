//! Adapters — implementations of the port traits.
//!
//! The outer ring of the architecture: everything here talks to a real
//! backend (logger, bench console, device peripherals) on behalf of the
//! port-driven core. Device-only adapters are gated behind the `espidf`
//! feature; the rest build on any host.

pub mod bench;
pub mod indicator_pin;
pub mod log_sink;

#[cfg(feature = "espidf")]
pub mod hardware;
