//! Connectivity supervisor: join/leave tracking and rejoin nudging.
//!
//! The stack's signal handler fires for many reasons; this component only
//! reacts to the edge of the joined flag, compared against the previous
//! delivery. On a join edge it puts the node into its reporting posture
//! (indicator off, long poll, report thresholds, sampler armed); on a leave
//! edge it lights the indicator and starts the rejoin nudge, a fixed-interval
//! retry that signals user activity to keep the sleepy stack from powering
//! down past the point of rejoining. The retry interval is flat, not an
//! exponential backoff.
//!
//! Report thresholds are reapplied on every join, including rejoins; stored
//! configuration is not assumed to have survived a disconnect.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{
    EventSink, IndicatorPort, NetworkPort, ReportableAttribute, TimerKind, TimerPort,
};
use crate::config::NodeConfig;
use crate::indicator::IndicatorController;
use crate::telemetry::TelemetrySampler;

/// The attributes whose periodic reporting is configured on every join.
const REPORTED_ATTRIBUTES: [ReportableAttribute; 3] = [
    ReportableAttribute::Temperature,
    ReportableAttribute::Humidity,
    ReportableAttribute::BatteryPercentRemaining,
];

/// Tracks mesh membership and drives the join/leave reactions.
pub struct LinkSupervisor {
    /// Joined flag at the previous signal delivery.
    was_joined: bool,

    rejoin_initial_delay_ms: u32,
    rejoin_period_ms: u32,
    long_poll_interval_secs: u32,
    report_min_interval_secs: u16,
    report_max_interval_secs: u16,
}

impl LinkSupervisor {
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            was_joined: false,
            rejoin_initial_delay_ms: config.rejoin_initial_delay_secs * 1000,
            rejoin_period_ms: config.rejoin_period_secs * 1000,
            long_poll_interval_secs: config.long_poll_interval_secs,
            report_min_interval_secs: config.report_min_interval_secs,
            report_max_interval_secs: config.report_max_interval_secs,
        }
    }

    /// Handle one asynchronous stack signal: read the joined flag and react
    /// to its edge, if any.
    pub fn on_signal(
        &mut self,
        net: &mut impl NetworkPort,
        timers: &mut impl TimerPort,
        sampler: &mut TelemetrySampler,
        indicator: &mut IndicatorController,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        let joined = net.is_joined();

        if joined && !self.was_joined {
            info!("joined network");
            indicator.link_changed(true, hw);
            net.set_long_poll_interval(self.long_poll_interval_secs);
            self.configure_reporting(net);
            sampler.arm(timers);
            sink.emit(&AppEvent::Joined);
        } else if !joined && self.was_joined {
            info!("left network");
            indicator.link_changed(false, hw);
            timers.schedule_once(TimerKind::RejoinTick, self.rejoin_initial_delay_ms);
            info!(
                "rejoin nudge armed, first attempt in {} s",
                self.rejoin_initial_delay_ms / 1000
            );
            sink.emit(&AppEvent::Left);
        }

        self.was_joined = joined;
    }

    /// Rejoin nudge fired. Self-terminating once the stack reports joined;
    /// otherwise signal activity and re-arm at the fixed period.
    pub fn rejoin_tick(&mut self, net: &mut impl NetworkPort, timers: &mut impl TimerPort) {
        if net.is_joined() {
            info!("already joined, rejoin nudge retired");
            return;
        }
        info!("still orphaned, waking stack for rejoin");
        net.signal_user_activity();
        timers.schedule_once(TimerKind::RejoinTick, self.rejoin_period_ms);
    }

    /// Joined flag at the last signal delivery.
    pub fn is_joined(&self) -> bool {
        self.was_joined
    }

    // ── Internal ──────────────────────────────────────────────

    /// Apply the periodic reporting thresholds for every reported attribute.
    /// Delta is zero: report on every periodic tick, never suppress for lack
    /// of change. Rejections are logged per attribute and not retried — the
    /// next join reapplies everything anyway.
    fn configure_reporting(&self, net: &mut impl NetworkPort) {
        for attribute in REPORTED_ATTRIBUTES {
            match net.configure_periodic_report(
                attribute,
                self.report_min_interval_secs,
                self.report_max_interval_secs,
                0,
            ) {
                Ok(()) => info!("{attribute:?} reporting configured"),
                Err(e) => warn!("{attribute:?} reporting configuration failed: {e}"),
            }
        }
    }
}
