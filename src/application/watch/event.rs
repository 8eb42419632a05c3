//! Watch event types and timing

use std::time::Duration;

use super::coalescer::SyncTrigger;
use crate::application::sync::SyncReport;

/// Quiet period after the last change before a pass runs
pub const DEFAULT_DEBOUNCE_MS: u64 = 2_000;

/// Safety-net interval for periodic passes
pub const DEFAULT_TICK_SECS: u64 = 15 * 60;

/// Debounce window and ticker interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchTiming {
    pub debounce: Duration,
    pub tick_interval: Duration,
}

impl Default for WatchTiming {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            tick_interval: Duration::from_secs(DEFAULT_TICK_SECS),
        }
    }
}

impl WatchTiming {
    pub fn new(debounce: Duration, tick_interval: Duration) -> Self {
        Self {
            debounce,
            tick_interval,
        }
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted {
        source: String,
        vault: String,
        watermark: i64,
    },
    /// The watched database changed
    SourceChanged { path: String },
    /// Pass started
    SyncStarted { trigger: SyncTrigger },
    /// Pass completed (possibly with per-book export errors)
    SyncComplete {
        trigger: SyncTrigger,
        records: usize,
        books: usize,
        written: usize,
        unchanged: usize,
        errors: usize,
        watermark: i64,
    },
    /// Pass aborted before any export
    SyncFailed {
        trigger: SyncTrigger,
        message: String,
        records: usize,
        books: usize,
        errors: usize,
    },
    /// Watcher backend error; the loop keeps running
    Error { message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    pub(crate) fn from_report(trigger: SyncTrigger, report: &SyncReport) -> Self {
        WatchEvent::SyncComplete {
            trigger,
            records: report.records,
            books: report.books,
            written: report.written.len(),
            unchanged: report.unchanged.len(),
            errors: report.error_count(),
            watermark: report.final_watermark().position(),
        }
    }

    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_matches_documented_values() {
        let timing = WatchTiming::default();
        assert_eq!(timing.debounce, Duration::from_secs(2));
        assert_eq!(timing.tick_interval, Duration::from_secs(900));
    }

    #[test]
    fn json_includes_command_and_snake_case_fields() {
        let event = WatchEvent::SyncStarted {
            trigger: SyncTrigger::SourceChanged,
        };
        let value: serde_json::Value = serde_json::from_str(&event.to_json()).unwrap();
        assert_eq!(value["command"], "watch");
        assert_eq!(value["event"], "sync_started");
        assert_eq!(value["trigger"], "source_changed");
    }

    #[test]
    fn shutdown_serializes_as_unit_event() {
        let value: serde_json::Value =
            serde_json::from_str(&WatchEvent::Shutdown.to_json()).unwrap();
        assert_eq!(value, serde_json::json!({"event": "shutdown", "command": "watch"}));
    }
}
