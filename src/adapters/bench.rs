//! Bench network adapter.
//!
//! A log-only [`NetworkPort`] for radio-less bring-up: attribute pushes and
//! commands land in the log and in a small in-memory history instead of a
//! mesh. The joined flag is flipped from the bench console (or a test);
//! flipping it and then delivering a `NetworkSignal` event exercises the
//! whole join/leave path on hardware that has no radio fitted.

use heapless::Vec;
use log::info;

use crate::app::ports::{
    AttributeValue, ClimateSample, ClimateSensorPort, NetworkPort, OnOffCommand,
    ReportableAttribute,
};
use crate::config::Destination;
use crate::error::{NetworkError, SensorError};

/// How many recent attribute pushes the bench history retains.
const HISTORY_CAP: usize = 8;

/// Log-only stand-in for the mesh stack.
pub struct BenchNetwork {
    joined: bool,
    /// Most recent attribute pushes, oldest first.
    history: Vec<(ReportableAttribute, AttributeValue), HISTORY_CAP>,
}

impl BenchNetwork {
    pub fn new() -> Self {
        Self {
            joined: false,
            history: Vec::new(),
        }
    }

    /// Flip the simulated membership flag. The caller is responsible for
    /// delivering a `NetworkSignal` event afterwards, exactly as the real
    /// stack's signal handler would.
    pub fn set_joined(&mut self, joined: bool) {
        self.joined = joined;
    }

    /// Recent attribute pushes, oldest first.
    pub fn history(&self) -> &[(ReportableAttribute, AttributeValue)] {
        &self.history
    }
}

impl NetworkPort for BenchNetwork {
    fn is_joined(&self) -> bool {
        self.joined
    }

    fn set_reportable_attribute(
        &mut self,
        attribute: ReportableAttribute,
        value: AttributeValue,
    ) -> Result<(), NetworkError> {
        info!("bench: attribute {attribute:?} = {value:?}");
        if self.history.is_full() {
            self.history.remove(0);
        }
        let _ = self.history.push((attribute, value));
        Ok(())
    }

    fn send_command(
        &mut self,
        destination: Destination,
        command: OnOffCommand,
    ) -> Result<(), NetworkError> {
        info!(
            "bench: {command:?} -> 0x{:04X}/{}",
            destination.short_addr, destination.endpoint
        );
        Ok(())
    }

    fn configure_periodic_report(
        &mut self,
        attribute: ReportableAttribute,
        min_interval_secs: u16,
        max_interval_secs: u16,
        delta: u16,
    ) -> Result<(), NetworkError> {
        info!(
            "bench: report config {attribute:?} min={min_interval_secs}s \
             max={max_interval_secs}s delta={delta}"
        );
        Ok(())
    }

    fn set_long_poll_interval(&mut self, interval_secs: u32) {
        info!("bench: long poll interval {interval_secs}s");
    }

    fn signal_user_activity(&mut self) {
        info!("bench: user activity");
    }

    fn request_identify(&mut self) -> Result<(), NetworkError> {
        info!("bench: identify requested");
        Ok(())
    }
}

/// Fixed-value climate source for benches without the real sensor fitted.
pub struct BenchClimate;

impl ClimateSensorPort for BenchClimate {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        Ok(ClimateSample {
            temperature_c: 21.5,
            humidity_pct: 45.0,
        })
    }
}
