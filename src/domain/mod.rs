//! Domain Layer
//!
//! The sync rules without I/O: highlight records, book grouping, the
//! watermark, and the ports the application layer drives.
//!
//! ## Structure
//!
//! - `entities/` - Highlight records and per-pass book groups
//! - `value_objects/` - Watermark and normalized book keys
//! - `ports/` - Interfaces implemented by infrastructure (source, writer, state)

pub mod entities;
pub mod ports;
pub mod value_objects;
