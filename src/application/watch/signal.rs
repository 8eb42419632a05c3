//! Inputs to the watch loop
//!
//! File-system notifications and cancellation arrive on one channel so the
//! loop can block on a single receiver with a deadline.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Instant;

/// Something the watch loop must react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The watched database was created or modified
    SourceChanged(PathBuf),
    /// The notification backend reported a problem
    WatcherError(String),
    /// Ctrl+C / SIGTERM
    Shutdown,
}

/// Why `EventSource::wait` returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wake {
    Signal(Signal),
    DeadlineReached,
    /// Every sender is gone; no more signals will arrive
    Disconnected,
}

/// Blocking wait for the next signal or deadline
pub trait EventSource {
    /// Wait until a signal arrives or `deadline` passes.
    /// `None` waits indefinitely.
    fn wait(&mut self, deadline: Option<Instant>) -> Wake;
}

/// Monotonic time source
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// `EventSource` over an mpsc receiver
pub struct ChannelEventSource {
    rx: Receiver<Signal>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<Signal>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn wait(&mut self, deadline: Option<Instant>) -> Wake {
        let Some(deadline) = deadline else {
            return match self.rx.recv() {
                Ok(signal) => Wake::Signal(signal),
                Err(_) => Wake::Disconnected,
            };
        };

        let timeout = deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(timeout) {
            Ok(signal) => Wake::Signal(signal),
            Err(RecvTimeoutError::Timeout) => Wake::DeadlineReached,
            Err(RecvTimeoutError::Disconnected) => Wake::Disconnected,
        }
    }
}
