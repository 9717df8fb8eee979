//! Port traits — the boundary between the control core and its collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ NodeService (domain)
//! ```
//!
//! Driven adapters (mesh stack, climate sensor, battery ADC, indicator and
//! contact GPIO, timers, event sinks) implement these traits. The
//! [`NodeService`](super::service::NodeService) consumes them via generics,
//! so the core never touches the stack or hardware directly.
//!
//! The mesh stack behind [`NetworkPort`] is an external collaborator: device
//! registration, attribute encoding, transport, and commissioning all live on
//! the far side of this trait.

use crate::config::Destination;
use crate::error::{NetworkError, SensorError};

// ───────────────────────────────────────────────────────────────
// Protocol value types
// ───────────────────────────────────────────────────────────────

/// The attributes this node reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportableAttribute {
    /// Measured temperature, centi-degrees Celsius, signed 16-bit.
    Temperature,
    /// Measured relative humidity, centi-percent, signed 16-bit.
    Humidity,
    /// Remaining battery capacity, half-percent units, unsigned 8-bit.
    BatteryPercentRemaining,
}

/// Wire representation of one reportable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeValue {
    Signed16(i16),
    Unsigned8(u8),
}

/// Commands the contact dispatcher can send downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnOffCommand {
    Off,
    On,
}

// ───────────────────────────────────────────────────────────────
// Network stack port (driven adapter: domain ↔ mesh stack)
// ───────────────────────────────────────────────────────────────

/// The narrow interface the core needs from the mesh network stack.
pub trait NetworkPort {
    /// Whether the node currently has active mesh membership.
    fn is_joined(&self) -> bool;

    /// Update a reportable attribute's value; the stack handles delivery
    /// subject to the configured min/max interval and delta rules.
    fn set_reportable_attribute(
        &mut self,
        attribute: ReportableAttribute,
        value: AttributeValue,
    ) -> core::result::Result<(), NetworkError>;

    /// Queue a command to a remote node. Submission is asynchronous; `Ok`
    /// means queued, not delivered.
    fn send_command(
        &mut self,
        destination: Destination,
        command: OnOffCommand,
    ) -> core::result::Result<(), NetworkError>;

    /// (Re)configure periodic reporting for one attribute. A delta of zero
    /// means "never suppress for lack of change".
    fn configure_periodic_report(
        &mut self,
        attribute: ReportableAttribute,
        min_interval_secs: u16,
        max_interval_secs: u16,
        delta: u16,
    ) -> core::result::Result<(), NetworkError>;

    /// Stretch the stack's long-poll interval (battery optimisation).
    fn set_long_poll_interval(&mut self, interval_secs: u32);

    /// Tell the stack the user interacted with the device, keeping it from
    /// powering further down and prompting a rejoin attempt when orphaned.
    fn signal_user_activity(&mut self);

    /// Ask the stack to enter (or leave) identify mode for this node's
    /// endpoint. Identify start/end is delivered back asynchronously.
    fn request_identify(&mut self) -> core::result::Result<(), NetworkError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One temperature/humidity sample in engineering units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Read-side port for the combined temperature/humidity sensor.
pub trait ClimateSensorPort {
    /// Fetch the latest sample from the sensor.
    fn read_climate(&mut self) -> core::result::Result<ClimateSample, SensorError>;
}

/// Read-side port for the battery voltage ADC.
pub trait BatteryAdcPort {
    /// Take one oversampled reading of the supply rail, in millivolts.
    /// The implementation powers the converter up and back down before
    /// returning, bounding the energy cost of each call.
    fn read_battery_millivolts(&mut self) -> core::result::Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator and contact GPIO ports
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single network-indicator LED.
pub trait IndicatorPort {
    fn set_indicator(&mut self, on: bool);
}

/// The contact (hall-effect) input line and its interrupt trigger.
///
/// Levels are logical: `true` = contact closed (magnet present).
pub trait ContactGpioPort {
    /// Current logical level of the contact line.
    fn level(&self) -> bool;

    /// Mask the contact interrupt.
    fn disable_trigger(&mut self);

    /// Arm the interrupt to fire while the line sits at `level`.
    /// Level-triggered rather than edge-triggered: cheaper on this
    /// hardware than a dual-edge trigger.
    fn arm_trigger(&mut self, level: bool);
}

// ───────────────────────────────────────────────────────────────
// Timer port (driven adapter: domain → one-shot scheduler)
// ───────────────────────────────────────────────────────────────

/// The one-shot timers the core schedules. At most one timer of each kind is
/// ever outstanding; the kind identifies the timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum TimerKind {
    /// Telemetry sampler: temperature/humidity cycle.
    ClimateTick = 0,
    /// Telemetry sampler: battery cycle.
    BatteryTick = 1,
    /// Connectivity supervisor: rejoin nudge.
    RejoinTick = 2,
    /// Indicator: restore after a contact flash.
    FlashRestore = 3,
    /// Indicator: identify-mode blink toggle.
    IdentifyToggle = 4,
}

impl TimerKind {
    /// Total number of kinds — used to size the timer slot table.
    pub const COUNT: usize = 5;
}

/// One-shot timer scheduling. Each timer is owned by the component that
/// scheduled it; only the owner cancels it.
pub trait TimerPort {
    /// Schedule `kind` to fire once after `delay_ms`. Rescheduling a kind
    /// that is already pending replaces its deadline.
    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u32);

    /// Cancel a pending timer. Canceling a non-pending timer is a no-op.
    fn cancel(&mut self, kind: TimerKind);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s through
/// this port. Adapters decide where they go (serial log, test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
