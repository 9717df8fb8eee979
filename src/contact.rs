//! Contact (hall-effect) input: interrupt observer and task dispatcher.
//!
//! The GPIO interrupt fires in a restricted context that must not touch the
//! network stack, so the input is handled in two halves:
//!
//! - [`ContactSense`] runs in the ISR. It masks the trigger, reads the line,
//!   compares against the last *observed* level, and hands off at most one
//!   dispatch request per genuine flip before re-arming the trigger for the
//!   opposite level. The trigger is level-based, not dual-edge (lower power
//!   on this hardware); that no transition is missed between mask and re-arm
//!   is a hardware guarantee that must be re-validated per target.
//! - [`ContactDispatcher`] runs on the task queue. It re-reads the line
//!   (ground truth, not the ISR's cached value), compares against the last
//!   *acted-upon* level, and drops duplicate wake-ups. A genuine change
//!   flashes the indicator and sends exactly one downstream command:
//!   closed → Off, opened → On.
//!
//! The observed/acted-upon pair is the whole debounce: bounce storms
//! collapse because duplicates are filtered by comparison, not by waiting.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{
    ContactGpioPort, EventSink, IndicatorPort, NetworkPort, OnOffCommand, TimerPort,
};
use crate::config::Destination;
use crate::indicator::IndicatorController;

// ───────────────────────────────────────────────────────────────
// Interrupt half
// ───────────────────────────────────────────────────────────────

/// Interrupt-context state: the last level the ISR observed.
///
/// The only field shared across execution contexts; single-writer (the ISR)
/// by construction, read-only from task context.
pub struct ContactSense {
    observed_closed: AtomicBool,
}

impl ContactSense {
    /// Power-on assumption: contact open (magnet absent, line low).
    pub const fn new() -> Self {
        Self {
            observed_closed: AtomicBool::new(false),
        }
    }

    /// ISR body. Returns `true` when exactly one dispatch request should be
    /// queued for the task context; the caller pushes the event so this type
    /// stays free of queue knowledge.
    ///
    /// Keep this minimal: one GPIO read, one flag update, two trigger
    /// reconfigurations. Nothing here may contend with task-context code.
    pub fn on_interrupt(&self, gpio: &mut impl ContactGpioPort) -> bool {
        // Mask first so a bouncing line cannot re-enter.
        gpio.disable_trigger();

        let level = gpio.level();
        let dispatch = level != self.observed_closed.load(Ordering::Relaxed);
        if dispatch {
            self.observed_closed.store(level, Ordering::Relaxed);
        }

        // Re-arm for the opposite of the observed level so the next physical
        // transition in either direction fires again.
        gpio.arm_trigger(!self.observed_closed.load(Ordering::Relaxed));

        dispatch
    }

    /// Last level the ISR observed.
    pub fn observed_level(&self) -> bool {
        self.observed_closed.load(Ordering::Relaxed)
    }
}

// ───────────────────────────────────────────────────────────────
// Task half
// ───────────────────────────────────────────────────────────────

/// Task-context state: the last level acted upon, plus the command target.
pub struct ContactDispatcher {
    acted_closed: bool,
    destination: Destination,
}

impl ContactDispatcher {
    pub fn new(destination: Destination) -> Self {
        Self {
            // Matches the ISR's power-on assumption.
            acted_closed: false,
            destination,
        }
    }

    /// Handle one dispatch request from the ISR.
    ///
    /// Re-reads the line rather than trusting the ISR's cached level; a
    /// bounce between the ISR and this callback then resolves to whatever
    /// the line actually settled at. Duplicate wake-ups (no change since the
    /// last acted-upon level) are dropped without side effects.
    ///
    /// `hw` carries both the contact line (re-read) and the indicator LED
    /// (flash).
    pub fn dispatch<H>(
        &mut self,
        hw: &mut H,
        net: &mut impl NetworkPort,
        indicator: &mut IndicatorController,
        timers: &mut impl TimerPort,
        sink: &mut impl EventSink,
    ) where
        H: ContactGpioPort + IndicatorPort,
    {
        let closed = hw.level();
        if closed == self.acted_closed {
            return;
        }
        self.acted_closed = closed;

        indicator.start_flash(hw, timers);

        // Closed contact suppresses the bound load; open restores it.
        let command = if closed {
            OnOffCommand::Off
        } else {
            OnOffCommand::On
        };
        info!(
            "contact {}: sending {:?}",
            if closed { "closed" } else { "opened" },
            command
        );
        if let Err(e) = net.send_command(self.destination, command) {
            // Not retried; the next physical transition is the recovery.
            warn!("contact command failed: {e}");
        }

        sink.emit(&AppEvent::ContactChanged { closed });
    }

    /// Last level this dispatcher acted upon.
    pub fn acted_level(&self) -> bool {
        self.acted_closed
    }
}
