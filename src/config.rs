//! System configuration parameters
//!
//! All timing contracts, reporting thresholds, and addressing for the
//! DoorSense node. The defaults are the production values; integration
//! builds may override individual fields at construction time.

use serde::{Deserialize, Serialize};

/// Where contact open/close commands are delivered.
///
/// The coordinator's first endpoint, by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Short network address of the receiving node.
    pub short_addr: u16,
    /// Endpoint number on the receiving node.
    pub endpoint: u8,
}

/// Core node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    // --- Climate telemetry cycle ---
    /// Delay from join to the first temperature/humidity report (seconds).
    pub climate_initial_delay_secs: u32,
    /// Period between temperature/humidity reports (seconds).
    pub climate_period_secs: u32,

    // --- Battery telemetry cycle ---
    /// Delay from join to the first battery report (seconds).
    pub battery_initial_delay_secs: u32,
    /// Period between battery reports (seconds).
    pub battery_period_secs: u32,

    // --- Connectivity supervision ---
    /// Delay from leave to the first rejoin nudge (seconds).
    pub rejoin_initial_delay_secs: u32,
    /// Period between rejoin nudges while the network stays down (seconds).
    pub rejoin_period_secs: u32,
    /// Long-poll interval requested from the stack once joined (seconds).
    pub long_poll_interval_secs: u32,

    // --- Attribute reporting thresholds (applied on every join) ---
    /// Minimum interval between reports for one attribute (seconds).
    pub report_min_interval_secs: u16,
    /// Maximum interval between reports for one attribute (seconds).
    /// 0xFFFF would disable reporting entirely, so the widest usable
    /// value is 0xFFFE.
    pub report_max_interval_secs: u16,

    // --- Indicator ---
    /// Duration of the contact-event indicator flash (milliseconds).
    pub contact_flash_ms: u32,
    /// Half-period of the identify-mode blink (milliseconds).
    pub identify_blink_ms: u32,

    // --- Addressing ---
    /// Destination for contact open/close commands.
    pub destination: Destination,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            // Climate: first report shortly after join, then every 5 minutes.
            climate_initial_delay_secs: 10,
            climate_period_secs: 5 * 60,

            // Battery: coarse capacity moves slowly; every 6 hours is plenty.
            battery_initial_delay_secs: 60,
            battery_period_secs: 6 * 60 * 60,

            // Rejoin: first nudge after 30 s, then every 5 minutes, forever.
            rejoin_initial_delay_secs: 30,
            rejoin_period_secs: 5 * 60,
            long_poll_interval_secs: 3600,

            // Delta is always zero (report on every periodic tick); only the
            // interval bounds are configurable.
            report_min_interval_secs: 0x0001,
            report_max_interval_secs: 0xFFFE,

            contact_flash_ms: 500,
            identify_blink_ms: 100,

            destination: Destination {
                short_addr: 0x0000,
                endpoint: 1,
            },
        }
    }
}
