//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Does NOT touch SQLite, the filesystem, or notify directly
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `SyncPass` - One fetch → group → write → persist cycle
//! - `WatchUseCase` - Startup pass, debounced change passes, periodic passes

pub mod sync;
pub mod watch;

#[cfg(test)]
mod fakes;

pub use sync::{PassMode, SyncEvent, SyncPass, SyncReport, SyncState, WatermarkUpdate};
pub use watch::{
    ChannelEventSource, Clock, Coalescer, CoalescerState, EventSource, Signal, SyncTrigger,
    SystemClock, Wake, WatchEvent, WatchExit, WatchTiming, WatchUseCase,
};
