//! Terminal output for the CLI
//!
//! Rendering is pure (`String` in, `String` out); commands decide where it
//! is printed. `--json` bypasses this module in favour of NDJSON events.

pub mod blocks;
pub mod context;
pub mod primitives;
pub mod terminal;
pub mod theme;
pub mod views;
