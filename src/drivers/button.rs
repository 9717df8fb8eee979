//! ISR-debounced push-button driver.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up; the GPIO fires on
//! both edges. The ISR records the raw level and edge timestamp into
//! atomics, and `tick()` (called from the main loop) emits a debounced
//! press or release once the line has been stable for the debounce window.
//!
//! The main loop forwards press events as user activity to the stack and
//! release events as identify requests. Factory-reset hold detection
//! belongs to the bootstrap collaborator, not this driver.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

const DEBOUNCE_MS: u32 = 50;

/// Raw ISR state: latest level and edge time (milliseconds since boot,
/// truncated to u32). Written by the ISR, read by the main loop.
static BUTTON_RAW_PRESSED: AtomicBool = AtomicBool::new(false);
static BUTTON_LAST_EDGE_MS: AtomicU32 = AtomicU32::new(0);

/// Debounced button events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

/// Task-side debouncer over the ISR's raw level.
pub struct ButtonDriver {
    debounced_pressed: bool,
}

impl ButtonDriver {
    pub fn new() -> Self {
        Self {
            debounced_pressed: false,
        }
    }

    /// Call from the main loop. `now_ms` is monotonic milliseconds.
    /// Returns a debounced edge event, if any.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let raw = BUTTON_RAW_PRESSED.load(Ordering::Acquire);
        if raw == self.debounced_pressed {
            return None;
        }
        let edge_ms = BUTTON_LAST_EDGE_MS.load(Ordering::Acquire);
        if now_ms.wrapping_sub(edge_ms) < DEBOUNCE_MS {
            // Still settling.
            return None;
        }
        self.debounced_pressed = raw;
        Some(if raw {
            ButtonEvent::Pressed
        } else {
            ButtonEvent::Released
        })
    }

    /// Current debounced level.
    pub fn is_pressed(&self) -> bool {
        self.debounced_pressed
    }
}

/// ISR handler — register on both edges of the button GPIO.
/// Safe to call from interrupt context (lock-free atomic stores).
pub fn button_isr_handler(pressed: bool, now_ms: u32) {
    BUTTON_RAW_PRESSED.store(pressed, Ordering::Release);
    BUTTON_LAST_EDGE_MS.store(now_ms, Ordering::Release);
}
