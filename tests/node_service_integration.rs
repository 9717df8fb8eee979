//! Integration tests: NodeService → components → ports.
//!
//! Drives the service exactly as the device main loop does — events in,
//! port calls out — with mock adapters recording every interaction and the
//! real one-shot timer queue providing the timing semantics.

use doorsense::app::events::AppEvent;
use doorsense::app::ports::{
    AttributeValue, BatteryAdcPort, ClimateSample, ClimateSensorPort, ContactGpioPort, EventSink,
    IndicatorPort, NetworkPort, OnOffCommand, ReportableAttribute, TimerKind,
};
use doorsense::app::service::NodeService;
use doorsense::battery::CapacityCurve;
use doorsense::config::{Destination, NodeConfig};
use doorsense::error::{NetworkError, SensorError};
use doorsense::events::Event;
use doorsense::timers::TimerQueue;

// ── Mock implementations ──────────────────────────────────────

struct MockHw {
    climate: Result<ClimateSample, SensorError>,
    battery_mv: Result<u16, SensorError>,
    contact_level: bool,
    indicator_states: Vec<bool>,
}

impl MockHw {
    fn new() -> Self {
        Self {
            climate: Ok(ClimateSample {
                temperature_c: 21.57,
                humidity_pct: 48.33,
            }),
            battery_mv: Ok(1400),
            contact_level: false,
            indicator_states: Vec::new(),
        }
    }

    fn indicator_on(&self) -> Option<bool> {
        self.indicator_states.last().copied()
    }
}

impl ClimateSensorPort for MockHw {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.climate
    }
}
impl BatteryAdcPort for MockHw {
    fn read_battery_millivolts(&mut self) -> Result<u16, SensorError> {
        self.battery_mv
    }
}
impl ContactGpioPort for MockHw {
    fn level(&self) -> bool {
        self.contact_level
    }
    fn disable_trigger(&mut self) {}
    fn arm_trigger(&mut self, _level: bool) {}
}
impl IndicatorPort for MockHw {
    fn set_indicator(&mut self, on: bool) {
        self.indicator_states.push(on);
    }
}

struct MockNet {
    joined: bool,
    pushed: Vec<(ReportableAttribute, AttributeValue)>,
    commands: Vec<(Destination, OnOffCommand)>,
    report_configs: Vec<(ReportableAttribute, u16, u16, u16)>,
    long_poll: Option<u32>,
    user_activity: usize,
    identify_requests: usize,
    reject_pushes: bool,
}

impl MockNet {
    fn new() -> Self {
        Self {
            joined: false,
            pushed: Vec::new(),
            commands: Vec::new(),
            report_configs: Vec::new(),
            long_poll: None,
            user_activity: 0,
            identify_requests: 0,
            reject_pushes: false,
        }
    }
}

impl NetworkPort for MockNet {
    fn is_joined(&self) -> bool {
        self.joined
    }
    fn set_reportable_attribute(
        &mut self,
        attribute: ReportableAttribute,
        value: AttributeValue,
    ) -> Result<(), NetworkError> {
        if self.reject_pushes {
            return Err(NetworkError::AttributeRejected(0x01));
        }
        self.pushed.push((attribute, value));
        Ok(())
    }
    fn send_command(
        &mut self,
        destination: Destination,
        command: OnOffCommand,
    ) -> Result<(), NetworkError> {
        self.commands.push((destination, command));
        Ok(())
    }
    fn configure_periodic_report(
        &mut self,
        attribute: ReportableAttribute,
        min: u16,
        max: u16,
        delta: u16,
    ) -> Result<(), NetworkError> {
        self.report_configs.push((attribute, min, max, delta));
        Ok(())
    }
    fn set_long_poll_interval(&mut self, interval_secs: u32) {
        self.long_poll = Some(interval_secs);
    }
    fn signal_user_activity(&mut self) {
        self.user_activity += 1;
    }
    fn request_identify(&mut self) -> Result<(), NetworkError> {
        self.identify_requests += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<AppEvent>,
}
impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

struct Harness {
    service: NodeService,
    hw: MockHw,
    net: MockNet,
    timers: TimerQueue,
    sink: RecordingSink,
}

impl Harness {
    fn new() -> Self {
        let config = NodeConfig::default();
        let mut hw = MockHw::new();
        let mut sink = RecordingSink::default();
        let mut service = NodeService::new(&config, CapacityCurve::nimh_aa(), &mut hw);
        service.start(&mut hw, &mut sink);
        Self {
            service,
            hw,
            net: MockNet::new(),
            timers: TimerQueue::new(),
            sink,
        }
    }

    fn handle(&mut self, event: Event) {
        self.service.handle_event(
            event,
            &mut self.hw,
            &mut self.net,
            &mut self.timers,
            &mut self.sink,
        );
    }

    /// Flip the mock joined flag and deliver a stack signal, as the real
    /// signal handler would.
    fn set_joined(&mut self, joined: bool) {
        self.net.joined = joined;
        self.handle(Event::NetworkSignal);
    }

    /// Advance the timer clock and feed fired timers back as events, as the
    /// device main loop does.
    fn advance_to(&mut self, now_ms: u64) {
        let mut fired = Vec::new();
        self.timers.advance(now_ms, |kind| fired.push(kind));
        for kind in fired {
            self.handle(Event::from(kind));
        }
    }
}

// ── Join posture ──────────────────────────────────────────────

#[test]
fn startup_lights_indicator_until_joined() {
    let h = Harness::new();
    assert_eq!(h.hw.indicator_on(), Some(true));
    assert!(matches!(h.sink.events[..], [AppEvent::Started]));
}

#[test]
fn join_configures_reporting_and_arms_sampler() {
    let mut h = Harness::new();
    h.set_joined(true);

    assert!(h.service.is_joined());
    assert_eq!(h.hw.indicator_on(), Some(false), "indicator off once joined");
    assert_eq!(h.net.long_poll, Some(3600));
    assert_eq!(h.net.report_configs.len(), 3);
    for (_, min, max, delta) in &h.net.report_configs {
        assert_eq!((*min, *max, *delta), (1, 0xFFFE, 0));
    }
    assert!(h.timers.is_pending(TimerKind::ClimateTick));
    assert!(h.timers.is_pending(TimerKind::BatteryTick));
}

#[test]
fn climate_and_battery_cycles_fire_and_repeat() {
    let mut h = Harness::new();
    h.set_joined(true);

    // First climate tick at +10 s.
    h.advance_to(10_000);
    assert_eq!(
        h.net.pushed,
        vec![
            (
                ReportableAttribute::Temperature,
                AttributeValue::Signed16(2157)
            ),
            (ReportableAttribute::Humidity, AttributeValue::Signed16(4833)),
        ]
    );

    // First battery tick at +60 s: 1400 mV → 96 % → 192 half-percent.
    h.advance_to(60_000);
    assert_eq!(
        h.net.pushed.last(),
        Some(&(
            ReportableAttribute::BatteryPercentRemaining,
            AttributeValue::Unsigned8(192)
        ))
    );

    // Second climate tick one period after the first.
    h.net.pushed.clear();
    h.advance_to(310_000);
    assert_eq!(h.net.pushed.len(), 2, "climate cycle repeats each period");
    assert!(h.timers.is_pending(TimerKind::ClimateTick));
}

#[test]
fn push_rejection_is_not_fatal_to_the_cycle() {
    let mut h = Harness::new();
    h.set_joined(true);
    h.net.reject_pushes = true;

    h.advance_to(10_000);
    assert!(h.net.pushed.is_empty());
    assert!(
        h.timers.is_pending(TimerKind::ClimateTick),
        "failures are logged, the next periodic tick is the retry"
    );
}

#[test]
fn dead_climate_driver_disables_climate_but_not_battery() {
    let config = NodeConfig::default();
    let mut hw = MockHw::new();
    hw.climate = Err(SensorError::NotReady);
    let mut sink = RecordingSink::default();
    let mut service = NodeService::new(&config, CapacityCurve::nimh_aa(), &mut hw);
    service.start(&mut hw, &mut sink);

    let mut h = Harness {
        service,
        hw,
        net: MockNet::new(),
        timers: TimerQueue::new(),
        sink,
    };
    h.set_joined(true);

    assert!(!h.timers.is_pending(TimerKind::ClimateTick));
    assert!(h.timers.is_pending(TimerKind::BatteryTick));

    h.advance_to(60_000);
    assert_eq!(h.net.pushed.len(), 1, "battery still reports");
}

// ── Leave / rejoin ────────────────────────────────────────────

#[test]
fn leave_stops_sampling_and_arms_rejoin() {
    let mut h = Harness::new();
    h.set_joined(true);
    h.advance_to(10_000); // first climate tick, rescheduled at +310 s

    h.set_joined(false);
    assert_eq!(h.hw.indicator_on(), Some(true), "indicator on when orphaned");
    assert!(h.timers.is_pending(TimerKind::RejoinTick));

    // The pending climate tick fires mid-outage: reads and pushes (the
    // stack buffers locally) but does not reschedule.
    h.advance_to(310_000);
    assert!(
        !h.timers.is_pending(TimerKind::ClimateTick),
        "cycle idles while not joined"
    );
}

#[test]
fn rejoin_nudge_retries_at_fixed_interval_until_joined() {
    let mut h = Harness::new();
    h.set_joined(true);
    h.set_joined(false);

    // First nudge at +30 s: still down → user activity + re-arm at +5 min.
    h.advance_to(30_000);
    assert_eq!(h.net.user_activity, 1);
    assert!(h.timers.is_pending(TimerKind::RejoinTick));

    // Second nudge: still down.
    h.advance_to(330_000);
    assert_eq!(h.net.user_activity, 2);

    // Stack rejoins before the third nudge fires: nudge self-terminates.
    h.net.joined = true;
    h.advance_to(630_000);
    assert_eq!(h.net.user_activity, 2);
    assert!(!h.timers.is_pending(TimerKind::RejoinTick));
}

#[test]
fn rejoin_reapplies_thresholds_and_rearms_from_initial_delay() {
    let mut h = Harness::new();
    h.set_joined(true);
    h.advance_to(10_000);
    h.set_joined(false);
    h.advance_to(310_000); // climate idles
    h.net.report_configs.clear();

    h.set_joined(true);
    assert_eq!(
        h.net.report_configs.len(),
        3,
        "thresholds reconfigured on every join"
    );
    assert_eq!(h.hw.indicator_on(), Some(false));

    // Re-armed from the initial delay relative to now, not mid-period.
    h.net.pushed.clear();
    h.advance_to(310_000 + 10_000);
    assert_eq!(h.net.pushed.len(), 2);
}

// ── Contact dispatch ──────────────────────────────────────────

#[test]
fn contact_close_and_open_send_one_command_each() {
    let mut h = Harness::new();
    h.set_joined(true);

    h.hw.contact_level = true;
    h.handle(Event::ContactDisturbed);
    h.hw.contact_level = false;
    h.handle(Event::ContactDisturbed);

    let dest = Destination {
        short_addr: 0x0000,
        endpoint: 1,
    };
    assert_eq!(
        h.net.commands,
        vec![(dest, OnOffCommand::Off), (dest, OnOffCommand::On)]
    );
}

#[test]
fn duplicate_contact_wakeups_are_filtered() {
    let mut h = Harness::new();
    h.set_joined(true);

    h.hw.contact_level = true;
    h.handle(Event::ContactDisturbed);
    h.handle(Event::ContactDisturbed);
    h.handle(Event::ContactDisturbed);

    assert_eq!(h.net.commands.len(), 1);
}

#[test]
fn contact_flash_restores_to_link_state() {
    let mut h = Harness::new();
    h.set_joined(true);

    h.hw.contact_level = true;
    h.handle(Event::ContactDisturbed);
    assert_eq!(h.hw.indicator_on(), Some(true), "flash forces LED on");
    assert!(h.timers.is_pending(TimerKind::FlashRestore));

    h.advance_to(500);
    assert_eq!(h.hw.indicator_on(), Some(false), "joined → LED back off");
}

#[test]
fn later_flash_supersedes_earlier_restore() {
    let mut h = Harness::new();
    h.set_joined(true);

    h.hw.contact_level = true;
    h.handle(Event::ContactDisturbed); // flash #1, restore due at 500
    h.advance_to(200);
    h.hw.contact_level = false;
    h.handle(Event::ContactDisturbed); // flash #2 cancels #1, restore at 700

    h.advance_to(500);
    assert_eq!(
        h.hw.indicator_on(),
        Some(true),
        "first restore was canceled; LED still lit"
    );
    h.advance_to(700);
    assert_eq!(h.hw.indicator_on(), Some(false), "second restore executes");
}

// ── Identify mode ─────────────────────────────────────────────

#[test]
fn identify_blink_overrides_link_transitions() {
    let mut h = Harness::new();
    h.set_joined(true);

    h.handle(Event::IdentifyStarted);
    assert!(h.service.is_identifying());
    assert_eq!(h.hw.indicator_on(), Some(true), "first toggle lights LED");

    // Link drops mid-identify: LED untouched until the next toggle.
    let writes = h.hw.indicator_states.len();
    h.set_joined(false);
    assert_eq!(h.hw.indicator_states.len(), writes);

    // Toggle ticks keep owning the pin.
    h.advance_to(100);
    assert_eq!(h.hw.indicator_on(), Some(false));
    h.advance_to(200);
    assert_eq!(h.hw.indicator_on(), Some(true));

    // Identify ends: steady link state (not joined → on).
    h.handle(Event::IdentifyEnded);
    assert_eq!(h.hw.indicator_on(), Some(true));
    assert!(!h.timers.is_pending(TimerKind::IdentifyToggle));
}

#[test]
fn identify_supersedes_pending_flash_restore() {
    let mut h = Harness::new();
    h.set_joined(true);

    h.hw.contact_level = true;
    h.handle(Event::ContactDisturbed); // restore due at 500
    h.advance_to(240);
    h.handle(Event::IdentifyStarted); // toggles at 240, 340, 440, 540, …
    h.advance_to(340);
    h.advance_to(440); // blink currently on

    // Only the flash restore is due in (440, 540): it must not write while
    // identify owns the pin.
    let writes = h.hw.indicator_states.len();
    h.advance_to(500);
    assert_eq!(h.hw.indicator_states.len(), writes, "restore superseded");
    assert_eq!(h.hw.indicator_on(), Some(true));
}

// ── Button ────────────────────────────────────────────────────

#[test]
fn button_press_signals_user_activity() {
    let mut h = Harness::new();
    h.handle(Event::ButtonPressed);
    assert_eq!(h.net.user_activity, 1);
}

#[test]
fn button_release_requests_identify_only_while_joined() {
    let mut h = Harness::new();
    h.handle(Event::ButtonReleased);
    assert_eq!(h.net.identify_requests, 0, "ignored while not joined");

    h.set_joined(true);
    h.handle(Event::ButtonReleased);
    assert_eq!(h.net.identify_requests, 1);
}
