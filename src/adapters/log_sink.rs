//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART / USB-CDC in production). A future wire or console adapter
//! would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("EVT | started"),
            AppEvent::Joined => info!("EVT | joined network"),
            AppEvent::Left => info!("EVT | left network"),
            AppEvent::ClimateReported {
                temperature_centi,
                humidity_centi,
            } => {
                info!(
                    "EVT | climate T={:.2} C RH={:.2} %",
                    f32::from(*temperature_centi) / 100.0,
                    f32::from(*humidity_centi) / 100.0,
                );
            }
            AppEvent::BatteryReported {
                millivolts,
                capacity_pct,
            } => {
                info!("EVT | battery {millivolts} mV / {capacity_pct}%");
            }
            AppEvent::ContactChanged { closed } => {
                info!("EVT | contact {}", if *closed { "closed" } else { "opened" });
            }
            AppEvent::IdentifyStarted => info!("EVT | identify started"),
            AppEvent::IdentifyEnded => info!("EVT | identify ended"),
        }
    }
}
