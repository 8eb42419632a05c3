//! Watch Use Case
//!
//! Long-lived sync driven by source-file changes and a periodic timer.
//! It orchestrates:
//! - A startup sync pass
//! - Trailing-edge debouncing of change notifications (2s default)
//! - A periodic safety-net pass (15min default)
//! - Cooperative shutdown on Ctrl+C / SIGTERM
//!
//! ## Architecture
//!
//! - `Coalescer` - Pure state machine (`Idle`, `DebouncePending`, `ShuttingDown`)
//!   that owns the debounce and ticker deadlines
//! - `EventSource` - Blocking wait for the next signal or deadline
//! - `WatchUseCase` - Single-threaded loop; at most one pass in flight
//! - `WatchEvent` - Events emitted during watch operation
//!
//! ## Usage
//!
//! ```ignore
//! let (tx, rx) = std::sync::mpsc::channel();
//! let use_case = WatchUseCase::new(pass, WatchTiming::default());
//! let mut events = ChannelEventSource::new(rx);
//! use_case.run(&mut state, &mut events, &SystemClock, |event| { ... });
//! ```

mod coalescer;
mod event;
mod signal;
mod use_case;


pub use coalescer::{Coalescer, CoalescerState, SyncTrigger};
pub use event::{WatchEvent, WatchTiming, DEFAULT_DEBOUNCE_MS, DEFAULT_TICK_SECS};
pub use signal::{ChannelEventSource, Clock, EventSource, Signal, SystemClock, Wake};
pub use use_case::{WatchExit, WatchUseCase};
