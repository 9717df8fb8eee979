//! Network-indicator arbitration.
//!
//! One physical LED is shared by three concerns, highest precedence first:
//!
//! 1. **Identify blink** — while the stack has this endpoint in identify
//!    mode, a self-rescheduling toggle owns the LED outright; every toggle
//!    tick overwrites whatever the lower layers wanted.
//! 2. **Contact flash** — a contact event forces the LED on, then a one-shot
//!    restore timer returns it to the steady link indication. A flash that
//!    starts while one is pending cancels the earlier restore, so an old
//!    timer can never darken a newer flash. The restore is superseded
//!    entirely when identify mode is active at expiry.
//! 3. **Steady link state** — on means not joined, off means joined.
//!
//! The controller owns the flash-restore and blink-toggle timers; nothing
//! else schedules or cancels them.

use log::debug;

use crate::app::ports::{IndicatorPort, TimerKind, TimerPort};

/// Arbitrates the single indicator LED.
pub struct IndicatorController {
    /// Latest link state reported by the supervisor.
    joined: bool,
    /// Whether identify mode currently owns the LED.
    identify_active: bool,
    /// Current phase of the identify blink.
    blink_on: bool,
    /// Half-period of the identify blink, milliseconds.
    blink_ms: u32,
    /// Duration of a contact flash, milliseconds.
    flash_ms: u32,
}

impl IndicatorController {
    pub fn new(flash_ms: u32, blink_ms: u32) -> Self {
        Self {
            joined: false,
            identify_active: false,
            blink_on: false,
            blink_ms,
            flash_ms,
        }
    }

    /// Apply the power-on state: not joined, LED on.
    pub fn startup(&mut self, hw: &mut impl IndicatorPort) {
        hw.set_indicator(true);
    }

    /// Supervisor reported a link transition. Steady indication: on while
    /// not joined. While identify mode is active only the internal state is
    /// updated; the blink owns the pin until identify ends.
    pub fn link_changed(&mut self, joined: bool, hw: &mut impl IndicatorPort) {
        self.joined = joined;
        if !self.identify_active {
            hw.set_indicator(!joined);
        }
    }

    /// Contact event: flash the LED for the configured duration.
    ///
    /// Cancels any pending restore first so an earlier flash's timer cannot
    /// turn the LED off underneath this one.
    pub fn start_flash(&mut self, hw: &mut impl IndicatorPort, timers: &mut impl TimerPort) {
        timers.cancel(TimerKind::FlashRestore);
        if !self.identify_active {
            hw.set_indicator(true);
        }
        timers.schedule_once(TimerKind::FlashRestore, self.flash_ms);
    }

    /// Flash-restore timer fired: return to steady link indication, unless
    /// identify mode took over in the meantime.
    pub fn flash_restore(&mut self, hw: &mut impl IndicatorPort) {
        if !self.identify_active {
            hw.set_indicator(!self.joined);
        }
    }

    /// Identify mode started: begin the blink cycle immediately.
    pub fn identify_started(
        &mut self,
        hw: &mut impl IndicatorPort,
        timers: &mut impl TimerPort,
    ) {
        debug!("identify blink start");
        self.identify_active = true;
        self.blink_on = false;
        self.identify_toggle(hw, timers);
    }

    /// Blink-toggle timer fired: flip the LED and re-arm.
    pub fn identify_toggle(
        &mut self,
        hw: &mut impl IndicatorPort,
        timers: &mut impl TimerPort,
    ) {
        if !self.identify_active {
            // Stale toggle after identify ended; the cancel already ran.
            return;
        }
        self.blink_on = !self.blink_on;
        hw.set_indicator(self.blink_on);
        timers.schedule_once(TimerKind::IdentifyToggle, self.blink_ms);
    }

    /// Identify mode ended: stop the blink and fall back to the steady link
    /// indication.
    pub fn identify_ended(&mut self, hw: &mut impl IndicatorPort, timers: &mut impl TimerPort) {
        debug!("identify blink end");
        self.identify_active = false;
        timers.cancel(TimerKind::IdentifyToggle);
        hw.set_indicator(!self.joined);
    }

    /// Whether identify mode currently owns the LED.
    pub fn is_identifying(&self) -> bool {
        self.identify_active
    }
}
