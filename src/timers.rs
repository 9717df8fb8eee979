//! One-shot timer table.
//!
//! Fixed-slot scheduler backing the [`TimerPort`]: one slot per
//! [`TimerKind`], holding an absolute deadline. At most one timer of each
//! kind is ever outstanding, so the kind doubles as the cancellation handle.
//! Self-rescheduling callbacks (sampler ticks, rejoin nudge, identify
//! toggle) re-arm their own slot from inside the fired handler.
//!
//! The main loop advances the table from its monotonic clock and converts
//! expiries into queue events; firing a slot clears it first, so a handler
//! that does not reschedule simply goes idle.

use crate::app::ports::{TimerKind, TimerPort};

/// All timer kinds, in slot order. Used to iterate the table.
const ALL_KINDS: [TimerKind; TimerKind::COUNT] = [
    TimerKind::ClimateTick,
    TimerKind::BatteryTick,
    TimerKind::RejoinTick,
    TimerKind::FlashRestore,
    TimerKind::IdentifyToggle,
];

/// Slot-per-kind one-shot timer queue.
pub struct TimerQueue {
    /// Absolute deadline in milliseconds, `None` when idle.
    deadlines: [Option<u64>; TimerKind::COUNT],
    /// Monotonic time of the latest `advance` call.
    now_ms: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            deadlines: [None; TimerKind::COUNT],
            now_ms: 0,
        }
    }

    /// Advance the clock to `now_ms` and fire every due slot.
    ///
    /// A slot is cleared before its callback runs, so callbacks are free to
    /// reschedule their own kind. Expiries fire in slot order within a
    /// single call; distinct calls preserve arrival order naturally.
    pub fn advance(&mut self, now_ms: u64, mut fired: impl FnMut(TimerKind)) {
        self.now_ms = now_ms;
        for kind in ALL_KINDS {
            let slot = &mut self.deadlines[kind as usize];
            if let Some(deadline) = *slot {
                if deadline <= now_ms {
                    *slot = None;
                    fired(kind);
                }
            }
        }
    }

    /// Whether a timer of `kind` is currently pending.
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.deadlines[kind as usize].is_some()
    }

    /// Deadline of the nearest pending timer, if any. Lets the main loop
    /// pick a sleep bound instead of polling blindly.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.iter().flatten().copied().min()
    }
}

impl TimerPort for TimerQueue {
    fn schedule_once(&mut self, kind: TimerKind, delay_ms: u32) {
        self.deadlines[kind as usize] = Some(self.now_ms + u64::from(delay_ms));
    }

    fn cancel(&mut self, kind: TimerKind) {
        // Canceling a non-pending timer is a safe no-op.
        self.deadlines[kind as usize] = None;
    }
}
