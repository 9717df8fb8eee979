//! Node service — the application core.
//!
//! [`NodeService`] owns the four stateful components (supervisor, sampler,
//! contact dispatcher, indicator) and routes task-queue events to them. It
//! exposes a clean, hardware-agnostic API; all I/O flows through port traits
//! injected at call sites, making the whole service testable with mock
//! adapters.
//!
//! ```text
//!  ClimateSensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  BatteryAdcPort   ──▶  │         NodeService           │
//!  ContactGpioPort  ──▶  │  Supervisor · Sampler         │ ──▶ NetworkPort
//!  TimerPort        ◀──  │  Dispatcher · Indicator       │
//!  IndicatorPort    ◀──  └──────────────────────────────┘
//! ```
//!
//! Every component field is process-lifetime state owned here — no
//! free-standing globals. The only exception is the interrupt half of the
//! contact input ([`ContactSense`](crate::contact::ContactSense)), which
//! must be reachable from the ISR and therefore lives wherever the platform
//! shim puts it; its dispatch requests arrive through the event queue like
//! everything else.

use log::{info, warn};

use crate::battery::CapacityCurve;
use crate::config::NodeConfig;
use crate::contact::ContactDispatcher;
use crate::events::Event;
use crate::indicator::IndicatorController;
use crate::supervisor::LinkSupervisor;
use crate::telemetry::TelemetrySampler;

use super::events::AppEvent;
use super::ports::{
    BatteryAdcPort, ClimateSensorPort, ContactGpioPort, EventSink, IndicatorPort, NetworkPort,
    TimerPort,
};

/// The application service: owns the supervisory-loop state and dispatches
/// task-queue events to the owning component.
pub struct NodeService {
    supervisor: LinkSupervisor,
    sampler: TelemetrySampler,
    dispatcher: ContactDispatcher,
    indicator: IndicatorController,
}

impl NodeService {
    /// Construct the service from configuration.
    ///
    /// Takes one synchronous climate read to seed the sampler; a failure
    /// there disables climate telemetry only (the node still joins and
    /// reports battery and contact events). Call [`start`](Self::start)
    /// next.
    pub fn new(
        config: &NodeConfig,
        curve: CapacityCurve,
        sensor: &mut impl ClimateSensorPort,
    ) -> Self {
        Self {
            supervisor: LinkSupervisor::new(config),
            sampler: TelemetrySampler::new(config, curve, sensor),
            dispatcher: ContactDispatcher::new(config.destination),
            indicator: IndicatorController::new(config.contact_flash_ms, config.identify_blink_ms),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Apply the power-on posture: indicator lit until the first join.
    pub fn start(&mut self, hw: &mut impl IndicatorPort, sink: &mut impl EventSink) {
        self.indicator.startup(hw);
        sink.emit(&AppEvent::Started);
        info!("node service started, waiting for network");
    }

    // ── Event routing ─────────────────────────────────────────

    /// Process one task-queue event to completion.
    ///
    /// `hw` satisfies every hardware-side port; the network stack and timer
    /// layer are passed separately so platform shims can own them apart.
    pub fn handle_event<H>(
        &mut self,
        event: Event,
        hw: &mut H,
        net: &mut impl NetworkPort,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) where
        H: ClimateSensorPort + BatteryAdcPort + ContactGpioPort + IndicatorPort,
    {
        match event {
            Event::NetworkSignal => self.supervisor.on_signal(
                net,
                timers,
                &mut self.sampler,
                &mut self.indicator,
                hw,
                sink,
            ),

            Event::ClimateTick => self.sampler.climate_tick(hw, net, timers, sink),
            Event::BatteryTick => self.sampler.battery_tick(hw, net, timers, sink),
            Event::RejoinTick => self.supervisor.rejoin_tick(net, timers),

            Event::ContactDisturbed => {
                self.dispatcher
                    .dispatch(hw, net, &mut self.indicator, timers, sink);
            }

            Event::FlashRestore => self.indicator.flash_restore(hw),
            Event::IdentifyToggle => self.indicator.identify_toggle(hw, timers),
            Event::IdentifyStarted => {
                self.indicator.identify_started(hw, timers);
                sink.emit(&AppEvent::IdentifyStarted);
            }
            Event::IdentifyEnded => {
                self.indicator.identify_ended(hw, timers);
                sink.emit(&AppEvent::IdentifyEnded);
            }

            Event::ButtonPressed => net.signal_user_activity(),
            Event::ButtonReleased => {
                // A short press asks the stack to identify this node; only
                // meaningful while joined.
                if net.is_joined() {
                    if let Err(e) = net.request_identify() {
                        warn!("identify request failed: {e}");
                    }
                } else {
                    warn!("not in a network, identify request ignored");
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Joined flag at the last processed stack signal.
    pub fn is_joined(&self) -> bool {
        self.supervisor.is_joined()
    }

    /// The telemetry sampler (state inspection for shims and tests).
    pub fn sampler(&self) -> &TelemetrySampler {
        &self.sampler
    }

    /// Whether identify mode currently owns the indicator.
    pub fn is_identifying(&self) -> bool {
        self.indicator.is_identifying()
    }
}
