//! DoorSense Firmware — Main Entry Point (bench build)
//!
//! Wires the port-driven core to real peripherals and runs the cooperative
//! event loop. The mesh stack itself lives outside this crate; this binary
//! uses the bench network adapter so the full supervisory loop can be
//! exercised on boards without a radio image flashed.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  EspHardware        BenchNetwork       LogEventSink        │
//! │  (GPIO/ADC/sensor)  (NetworkPort)      (EventSink)         │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ───────────────       │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │            NodeService (pure logic)              │      │
//! │  │  Supervisor · Sampler · Dispatcher · Indicator   │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │                                                            │
//! │  TimerQueue (one-shot slots) · Event queue (ISR → task)    │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{InterruptType, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;

use doorsense::adapters::bench::{BenchClimate, BenchNetwork};
use doorsense::adapters::hardware::{EspHardware, IsrContactGpio};
use doorsense::adapters::log_sink::LogEventSink;
use doorsense::app::service::NodeService;
use doorsense::battery::CapacityCurve;
use doorsense::config::NodeConfig;
use doorsense::contact::ContactSense;
use doorsense::drivers::button::{button_isr_handler, ButtonDriver, ButtonEvent};
use doorsense::events::{drain_events, push_event, Event};
use doorsense::pins;
use doorsense::timers::TimerQueue;

/// Interrupt half of the contact input. Static so the GPIO ISR can reach it;
/// its dispatch requests flow through the event queue like everything else.
static CONTACT_SENSE: ContactSense = ContactSense::new();

/// Milliseconds since boot (monotonic).
fn now_ms() -> u64 {
    (unsafe { esp_idf_sys::esp_timer_get_time() } / 1000) as u64
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  DoorSense v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let config = NodeConfig::default();

    // ── 2. Contact input + level interrupt ────────────────────
    let mut contact_pin = PinDriver::input(peripherals.pins.gpio4)?;
    contact_pin.set_pull(Pull::Floating)?; // external pull-up on the board
    // Power-on assumes the contact open (line low): wait for high.
    contact_pin.set_interrupt_type(InterruptType::HighLevel)?;
    unsafe {
        contact_pin.subscribe(|| {
            // ISR context: mask, read, flag, re-arm — nothing else.
            if CONTACT_SENSE.on_interrupt(&mut IsrContactGpio) {
                let _ = push_event(Event::ContactDisturbed);
            }
        })?;
    }
    contact_pin.enable_interrupt()?;

    // ── 3. Button input (both edges) ──────────────────────────
    let mut button_pin = PinDriver::input(peripherals.pins.gpio9)?;
    button_pin.set_pull(Pull::Floating)?; // external pull-up, active-low
    button_pin.set_interrupt_type(InterruptType::AnyEdge)?;
    unsafe {
        button_pin.subscribe(|| {
            let pressed = esp_idf_sys::gpio_get_level(pins::BUTTON_GPIO) == 0;
            button_isr_handler(pressed, now_ms() as u32);
        })?;
    }
    button_pin.enable_interrupt()?;

    // ── 4. Indicator, battery ADC, climate source ─────────────
    let indicator = PinDriver::output(peripherals.pins.gpio5)?;
    let adc = AdcDriver::new(peripherals.adc1)?;
    let battery_channel = AdcChannelDriver::new(
        &adc,
        peripherals.pins.gpio1,
        &EspHardware::<BenchClimate>::battery_adc_config(),
    )?;
    let mut hw = EspHardware::new(indicator, &adc, battery_channel, BenchClimate);

    // ── 5. Core service + bench network ───────────────────────
    let mut net = BenchNetwork::new();
    let mut timers = TimerQueue::new();
    let mut sink = LogEventSink::new();
    let mut button = ButtonDriver::new();

    let mut service = NodeService::new(&config, CapacityCurve::nimh_aa(), &mut hw);
    service.start(&mut hw, &mut sink);

    info!("System ready. Entering event loop.");

    // Bench only: pretend the stack joins shortly after boot so the whole
    // reporting posture can be exercised end-to-end without a radio.
    let mut bench_join_sent = false;

    // ── 6. Event loop ─────────────────────────────────────────
    loop {
        let now = now_ms();

        if !bench_join_sent && now > 2_000 {
            net.set_joined(true);
            let _ = push_event(Event::NetworkSignal);
            bench_join_sent = true;
        }

        // Convert timer expiries into queued work.
        timers.advance(now, |kind| {
            let _ = push_event(Event::from(kind));
        });

        // Debounce the button and forward its edges.
        if let Some(edge) = button.tick(now as u32) {
            let _ = push_event(match edge {
                ButtonEvent::Pressed => Event::ButtonPressed,
                ButtonEvent::Released => Event::ButtonReleased,
            });
        }

        // Run every pending callback to completion, in arrival order.
        drain_events(|event| {
            service.handle_event(event, &mut hw, &mut net, &mut timers, &mut sink);
        });

        FreeRtos::delay_ms(10);
    }
}
