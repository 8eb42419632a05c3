//! Change coalescer state machine
//!
//! Owns the debounce and ticker deadlines. It never sleeps and never reads
//! the clock itself: every transition takes `now` from the caller, so the
//! driver can be tested against a fake clock.

use std::time::Instant;

use serde::Serialize;

use super::event::WatchTiming;

/// Scheduling state of the watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoalescerState {
    /// Nothing pending besides the ticker
    Idle,
    /// A change was seen; a pass fires at `deadline` unless another change
    /// arrives first and pushes it back
    DebouncePending { deadline: Instant },
    /// Cancellation received; no further passes
    ShuttingDown,
}

/// Why a sync pass ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    Startup,
    SourceChanged,
    Periodic,
}

/// Debounce + ticker bookkeeping for the watch loop
#[derive(Debug, Clone)]
pub struct Coalescer {
    timing: WatchTiming,
    state: CoalescerState,
    next_tick: Option<Instant>,
}

impl Coalescer {
    /// Start in `Idle` with the first tick one interval after `now`.
    ///
    /// An interval too large to represent as an `Instant` disables the ticker.
    pub fn new(timing: WatchTiming, now: Instant) -> Self {
        Self {
            timing,
            state: CoalescerState::Idle,
            next_tick: now.checked_add(timing.tick_interval),
        }
    }

    pub fn state(&self) -> CoalescerState {
        self.state
    }

    pub fn is_shutting_down(&self) -> bool {
        self.state == CoalescerState::ShuttingDown
    }

    /// Earliest instant at which `poll` can yield a trigger.
    ///
    /// `None` once shutting down: the caller may block without a timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            CoalescerState::ShuttingDown => None,
            CoalescerState::Idle => self.next_tick,
            CoalescerState::DebouncePending { deadline } => Some(match self.next_tick {
                Some(tick) => tick.min(deadline),
                None => deadline,
            }),
        }
    }

    /// (Re)arm the debounce window; a burst collapses into one pass fired
    /// one window after its last change.
    pub fn source_changed(&mut self, now: Instant) {
        if self.is_shutting_down() {
            return;
        }
        // An unrepresentable window degrades to an immediate pass
        self.state = CoalescerState::DebouncePending {
            deadline: now.checked_add(self.timing.debounce).unwrap_or(now),
        };
    }

    /// Cancel the pending debounce and stop the ticker
    pub fn shutdown(&mut self) {
        self.state = CoalescerState::ShuttingDown;
        self.next_tick = None;
    }

    /// Consume whichever deadlines are due at `now`.
    ///
    /// Yields at most one trigger: a debounce and a tick due at the same
    /// wake-up are satisfied by a single pass.
    pub fn poll(&mut self, now: Instant) -> Option<SyncTrigger> {
        let debounce_due = match self.state {
            CoalescerState::ShuttingDown => return None,
            CoalescerState::DebouncePending { deadline } => deadline <= now,
            CoalescerState::Idle => false,
        };
        let tick_due = self.next_tick.is_some_and(|tick| tick <= now);

        if debounce_due {
            self.state = CoalescerState::Idle;
        }
        if tick_due {
            self.advance_ticker(now);
        }

        if debounce_due {
            Some(SyncTrigger::SourceChanged)
        } else if tick_due {
            Some(SyncTrigger::Periodic)
        } else {
            None
        }
    }

    // Keeps the fixed schedule; ticks missed while a pass ran are dropped.
    fn advance_ticker(&mut self, now: Instant) {
        let interval = self.timing.tick_interval;
        let mut next = self.next_tick;
        while let Some(tick) = next.filter(|tick| *tick <= now) {
            next = tick.checked_add(interval);
        }
        self.next_tick = next;
    }
}
