//! Interrupt-to-task event queue.
//!
//! Events are produced by:
//! - the contact GPIO ISR (exactly one dispatch request per observed flip)
//! - the one-shot timer layer (sampler ticks, rejoin nudge, indicator timers)
//! - the stack's asynchronous signal delivery (network status, identify)
//! - the button ISR/driver
//!
//! Events are consumed by the main loop, which processes them one at a time
//! in arrival order and runs each handler to completion — the cooperative
//! task queue of the design. Only the hardware ISR may preempt a running
//! handler, and the ISR side is restricted to producing into this queue.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ GPIO ISR    │────▶│              │     │                  │
//! │ Timer expiry│────▶│  Event Queue │────▶│  Main loop       │
//! │ Stack signal│────▶│  (lock-free) │     │  (NodeService)   │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum number of pending events.
/// Power of 2 for efficient ring buffer modulo.
const EVENT_QUEUE_CAP: usize = 16;

/// Task-queue event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Stack signals ─────────────────────────────────────
    /// The stack delivered a signal; the joined flag may have changed.
    NetworkSignal = 0,
    /// Identify mode started for this node's endpoint.
    IdentifyStarted = 1,
    /// Identify mode ended.
    IdentifyEnded = 2,

    // ── Contact input ─────────────────────────────────────
    /// The contact ISR observed a level flip; run the dispatcher.
    ContactDisturbed = 10,

    // ── Timer expiries ────────────────────────────────────
    /// Climate telemetry cycle fired.
    ClimateTick = 20,
    /// Battery telemetry cycle fired.
    BatteryTick = 21,
    /// Rejoin nudge fired.
    RejoinTick = 22,
    /// Contact-flash restore fired.
    FlashRestore = 23,
    /// Identify blink toggle fired.
    IdentifyToggle = 24,

    // ── User input ────────────────────────────────────────
    /// Button pressed (debounced).
    ButtonPressed = 30,
    /// Button released (debounced).
    ButtonReleased = 31,
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISR and timer contexts write (produce), the main loop reads (consume).
// Head/tail are atomic; each buffer slot is written before the head is
// published with Release and read after an Acquire load, so the single
// consumer always sees a fully written slot.

static EVENT_HEAD: AtomicU8 = AtomicU8::new(0);
static EVENT_TAIL: AtomicU8 = AtomicU8::new(0);
// Slot `head` is only written by the producer side before the Release store
// that publishes it, and only read by the consumer side after the matching
// Acquire load; the relaxed per-slot accesses need no further ordering.
static EVENT_BUFFER: [AtomicU8; EVENT_QUEUE_CAP] =
    [const { AtomicU8::new(0) }; EVENT_QUEUE_CAP];

/// Push an event into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    let head = EVENT_HEAD.load(Ordering::Relaxed);
    let tail = EVENT_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % EVENT_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    EVENT_BUFFER[head as usize].store(event as u8, Ordering::Relaxed);

    EVENT_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next event from the queue.
/// Called from the main loop (single consumer).
/// Returns `None` if the queue is empty.
pub fn pop_event() -> Option<Event> {
    let tail = EVENT_TAIL.load(Ordering::Relaxed);
    let head = EVENT_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = EVENT_BUFFER[tail as usize].load(Ordering::Relaxed);
    EVENT_TAIL.store((tail + 1) % EVENT_QUEUE_CAP as u8, Ordering::Release);

    event_from_u8(raw)
}

/// Drain all pending events into a handler, in FIFO arrival order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Number of pending events.
pub fn queue_len() -> usize {
    let head = EVENT_HEAD.load(Ordering::Relaxed) as usize;
    let tail = EVENT_TAIL.load(Ordering::Relaxed) as usize;
    (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
}

/// Map a fired one-shot timer to its task-queue event. Used by the main
/// loop when converting timer expiries into queued work.
impl From<crate::app::ports::TimerKind> for Event {
    fn from(kind: crate::app::ports::TimerKind) -> Self {
        use crate::app::ports::TimerKind;
        match kind {
            TimerKind::ClimateTick => Event::ClimateTick,
            TimerKind::BatteryTick => Event::BatteryTick,
            TimerKind::RejoinTick => Event::RejoinTick,
            TimerKind::FlashRestore => Event::FlashRestore,
            TimerKind::IdentifyToggle => Event::IdentifyToggle,
        }
    }
}

// ── Internal ──────────────────────────────────────────────────

fn event_from_u8(raw: u8) -> Option<Event> {
    match raw {
        0 => Some(Event::NetworkSignal),
        1 => Some(Event::IdentifyStarted),
        2 => Some(Event::IdentifyEnded),
        10 => Some(Event::ContactDisturbed),
        20 => Some(Event::ClimateTick),
        21 => Some(Event::BatteryTick),
        22 => Some(Event::RejoinTick),
        23 => Some(Event::FlashRestore),
        24 => Some(Event::IdentifyToggle),
        30 => Some(Event::ButtonPressed),
        31 => Some(Event::ButtonReleased),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The queue is a process-wide static; serialise the tests that touch it.
    static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn drain_all() {
        while pop_event().is_some() {}
    }

    #[test]
    fn fifo_order_preserved() {
        let _guard = TEST_LOCK.lock().unwrap();
        drain_all();
        assert!(push_event(Event::NetworkSignal));
        assert!(push_event(Event::ClimateTick));
        assert!(push_event(Event::ContactDisturbed));
        assert_eq!(pop_event(), Some(Event::NetworkSignal));
        assert_eq!(pop_event(), Some(Event::ClimateTick));
        assert_eq!(pop_event(), Some(Event::ContactDisturbed));
        assert_eq!(pop_event(), None);
    }

    #[test]
    fn full_queue_drops_and_reports() {
        let _guard = TEST_LOCK.lock().unwrap();
        drain_all();
        // Capacity is CAP - 1 usable slots for the ring discipline.
        for _ in 0..EVENT_QUEUE_CAP - 1 {
            assert!(push_event(Event::BatteryTick));
        }
        assert!(!push_event(Event::BatteryTick), "full queue must drop");
        drain_all();
        assert_eq!(queue_len(), 0);
    }

    #[test]
    fn roundtrip_every_variant() {
        let _guard = TEST_LOCK.lock().unwrap();
        drain_all();
        let all = [
            Event::NetworkSignal,
            Event::IdentifyStarted,
            Event::IdentifyEnded,
            Event::ContactDisturbed,
            Event::ClimateTick,
            Event::BatteryTick,
            Event::RejoinTick,
            Event::FlashRestore,
            Event::IdentifyToggle,
            Event::ButtonPressed,
            Event::ButtonReleased,
        ];
        for e in all {
            assert!(push_event(e));
            assert_eq!(pop_event(), Some(e));
        }
    }
}
