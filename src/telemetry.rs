//! Telemetry sampler: periodic climate and battery reporting.
//!
//! Two independent self-rescheduling cycles share this component: the
//! climate cycle (temperature + humidity) and the battery cycle. Each is an
//! explicit two-state machine — **Idle** (no fire time pending; the resting
//! state while not joined) and **Scheduled** (a one-shot tick is pending) —
//! rather than implicit control-flow recursion, so the idle-while-not-joined
//! invariant is directly observable.
//!
//! A tick reads its sensor, converts to wire units, pushes the reportable
//! attribute(s), then reschedules itself only while the node is joined.
//! Push and read failures are logged and never retried here; the next
//! periodic tick is the retry mechanism. The supervisor re-arms both cycles
//! from their initial delays on every join.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{
    AttributeValue, BatteryAdcPort, ClimateSensorPort, EventSink, NetworkPort,
    ReportableAttribute, TimerKind, TimerPort,
};
use crate::battery::CapacityCurve;
use crate::config::NodeConfig;

/// Wire unit scale: centi-degrees / centi-percent per engineering unit.
const CENTI_PER_UNIT: f32 = 100.0;

/// One reporting cycle is either resting or has a pending fire time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// No tick pending. Only reachable while not joined (or, for the
    /// climate cycle, when the sensor failed at startup).
    Idle,
    /// A one-shot tick is pending.
    Scheduled,
}

/// Periodic climate/battery sampler.
pub struct TelemetrySampler {
    climate: CycleState,
    battery: CycleState,
    /// Climate driver probed successfully at startup. When false the climate
    /// cycle stays permanently idle; battery reporting is unaffected.
    sensor_ready: bool,
    curve: CapacityCurve,

    climate_initial_delay_ms: u32,
    climate_period_ms: u32,
    battery_initial_delay_ms: u32,
    battery_period_ms: u32,

    last_temperature_centi: i16,
    last_humidity_centi: i16,
}

impl TelemetrySampler {
    /// Construct the sampler and take one synchronous climate read to seed
    /// the last-known values.
    ///
    /// A failed read here marks the climate driver unavailable for the life
    /// of the process — fatal to climate telemetry, but the node still joins
    /// and reports battery and contact events.
    pub fn new(
        config: &NodeConfig,
        curve: CapacityCurve,
        sensor: &mut impl ClimateSensorPort,
    ) -> Self {
        let (sensor_ready, temperature_centi, humidity_centi) = match sensor.read_climate() {
            Ok(sample) => {
                info!(
                    "initial climate read: {:.2} C, {:.2} %RH",
                    sample.temperature_c, sample.humidity_pct
                );
                (
                    true,
                    to_centi(sample.temperature_c),
                    to_centi(sample.humidity_pct),
                )
            }
            Err(e) => {
                warn!("climate driver unavailable, cycle disabled: {e}");
                (false, 0, 0)
            }
        };

        Self {
            climate: CycleState::Idle,
            battery: CycleState::Idle,
            sensor_ready,
            curve,
            climate_initial_delay_ms: config.climate_initial_delay_secs * 1000,
            climate_period_ms: config.climate_period_secs * 1000,
            battery_initial_delay_ms: config.battery_initial_delay_secs * 1000,
            battery_period_ms: config.battery_period_secs * 1000,
            last_temperature_centi: temperature_centi,
            last_humidity_centi: humidity_centi,
        }
    }

    /// Arm both cycles from their initial delays. Called by the supervisor
    /// on every join — including rejoins, where any still-pending tick is
    /// replaced rather than resumed mid-period.
    pub fn arm(&mut self, timers: &mut impl TimerPort) {
        if self.sensor_ready {
            timers.schedule_once(TimerKind::ClimateTick, self.climate_initial_delay_ms);
            self.climate = CycleState::Scheduled;
            info!(
                "climate cycle armed, first tick in {} s",
                self.climate_initial_delay_ms / 1000
            );
        }
        timers.schedule_once(TimerKind::BatteryTick, self.battery_initial_delay_ms);
        self.battery = CycleState::Scheduled;
        info!(
            "battery cycle armed, first tick in {} s",
            self.battery_initial_delay_ms / 1000
        );
    }

    /// Climate cycle fired: read, convert, push, maybe reschedule.
    pub fn climate_tick(
        &mut self,
        sensor: &mut impl ClimateSensorPort,
        net: &mut impl NetworkPort,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        self.climate = CycleState::Idle;

        match sensor.read_climate() {
            Ok(sample) => {
                let temperature_centi = to_centi(sample.temperature_c);
                let humidity_centi = to_centi(sample.humidity_pct);
                self.last_temperature_centi = temperature_centi;
                self.last_humidity_centi = humidity_centi;

                if let Err(e) = net.set_reportable_attribute(
                    ReportableAttribute::Temperature,
                    AttributeValue::Signed16(temperature_centi),
                ) {
                    warn!("temperature attribute push failed: {e}");
                } else {
                    info!("temperature attribute update: {:.2} C", sample.temperature_c);
                }

                if let Err(e) = net.set_reportable_attribute(
                    ReportableAttribute::Humidity,
                    AttributeValue::Signed16(humidity_centi),
                ) {
                    warn!("humidity attribute push failed: {e}");
                } else {
                    info!("humidity attribute update: {:.2} %RH", sample.humidity_pct);
                }

                sink.emit(&AppEvent::ClimateReported {
                    temperature_centi,
                    humidity_centi,
                });
            }
            Err(e) => warn!("climate read failed: {e}"),
        }

        if net.is_joined() {
            timers.schedule_once(TimerKind::ClimateTick, self.climate_period_ms);
            self.climate = CycleState::Scheduled;
        } else {
            info!("not joined, climate cycle idle until next join");
        }
    }

    /// Battery cycle fired: sample the rail, estimate, push, maybe
    /// reschedule. The ADC collaborator powers the converter up and down
    /// inside the read, bounding the energy cost of each tick.
    pub fn battery_tick(
        &mut self,
        adc: &mut impl BatteryAdcPort,
        net: &mut impl NetworkPort,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) {
        self.battery = CycleState::Idle;

        match adc.read_battery_millivolts() {
            Ok(millivolts) => {
                let capacity_pct = self.curve.estimate(millivolts);
                let half_percent = to_half_percent(capacity_pct);

                if let Err(e) = net.set_reportable_attribute(
                    ReportableAttribute::BatteryPercentRemaining,
                    AttributeValue::Unsigned8(half_percent),
                ) {
                    warn!("battery attribute push failed: {e}");
                } else {
                    info!("battery attribute update: {millivolts} mV / {capacity_pct}%");
                }

                sink.emit(&AppEvent::BatteryReported {
                    millivolts,
                    capacity_pct,
                });
            }
            Err(e) => warn!("battery ADC read failed: {e}"),
        }

        if net.is_joined() {
            timers.schedule_once(TimerKind::BatteryTick, self.battery_period_ms);
            self.battery = CycleState::Scheduled;
        } else {
            info!("not joined, battery cycle idle until next join");
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn climate_state(&self) -> CycleState {
        self.climate
    }

    pub fn battery_state(&self) -> CycleState {
        self.battery
    }

    pub fn sensor_ready(&self) -> bool {
        self.sensor_ready
    }

    /// Last converted climate values (seeds the attribute defaults at
    /// endpoint registration time).
    pub fn last_climate_centi(&self) -> (i16, i16) {
        (self.last_temperature_centi, self.last_humidity_centi)
    }
}

// ── Wire-unit conversions ─────────────────────────────────────

/// Engineering value → signed 16-bit centi-units, truncating toward zero
/// (saturating at the i16 range bounds).
fn to_centi(value: f32) -> i16 {
    (value * CENTI_PER_UNIT) as i16
}

/// Capacity percent → protocol half-percent unit, clamped to the valid
/// 0–200 range before doubling.
fn to_half_percent(capacity_pct: u8) -> u8 {
    capacity_pct.min(100) * 2
}
