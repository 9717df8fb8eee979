//! Unified error types for the DoorSense firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! event loop's error handling uniform. All variants are `Copy` so they can
//! be cheaply passed around and logged without allocation.
//!
//! Collaborator failures are local-only: nothing here is fatal to the
//! process, and no failure propagates past a log line — recovery is the next
//! periodic cycle or the next physical event.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A network-stack operation was rejected or could not be queued.
    Network(NetworkError),
    /// A sensor or ADC read failed.
    Sensor(SensorError),
    /// Build-time data is invalid (e.g. a malformed capacity table).
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Network stack errors
// ---------------------------------------------------------------------------

/// Failures reported by the mesh-stack collaborator.
///
/// Transient by taxonomy: the caller logs them and moves on; the next
/// periodic tick or physical event is the retry mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// The node has no active mesh membership.
    NotJoined,
    /// The stack rejected an attribute write (carries the stack status code).
    AttributeRejected(u8),
    /// The stack could not allocate or queue an outgoing command buffer.
    CommandQueueFull,
    /// Reporting (re)configuration was rejected (carries the stack status code).
    ReportConfigRejected(u8),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotJoined => write!(f, "not joined"),
            Self::AttributeRejected(code) => write!(f, "attribute rejected ({code})"),
            Self::CommandQueueFull => write!(f, "command queue full"),
            Self::ReportConfigRejected(code) => write!(f, "report config rejected ({code})"),
        }
    }
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Self::Network(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The driver is not ready (probe failed or still initialising).
    NotReady,
    /// The sample fetch or channel read failed.
    ReadFailed,
    /// The ADC conversion failed or timed out.
    AdcFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "driver not ready"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::AdcFailed => write!(f, "ADC conversion failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
