//! One-shot sync events for NDJSON output

use serde::Serialize;

use super::report::{PassMode, SyncReport, WatermarkUpdate};

/// Events emitted by `marginalia sync --json`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    Start {
        mode: PassMode,
        vault: String,
        watermark: i64,
    },
    /// One book could not be exported
    ExportError { message: String },
    /// The new watermark could not be persisted
    SaveFailed { attempted: i64, message: String },
    Complete {
        mode: PassMode,
        records: usize,
        books: usize,
        written: usize,
        unchanged: usize,
        errors: usize,
        from: i64,
        watermark: i64,
    },
    /// The pass aborted before exporting anything
    Failed { message: String },
}

impl SyncEvent {
    /// Per-error events followed by the completion summary
    pub fn from_report(report: &SyncReport) -> Vec<SyncEvent> {
        let mut events: Vec<SyncEvent> = report
            .export_errors
            .iter()
            .map(|message| SyncEvent::ExportError {
                message: message.clone(),
            })
            .collect();

        if let WatermarkUpdate::SaveFailed { attempted, message } = &report.watermark {
            events.push(SyncEvent::SaveFailed {
                attempted: attempted.position(),
                message: message.clone(),
            });
        }

        events.push(SyncEvent::Complete {
            mode: report.mode,
            records: report.records,
            books: report.books,
            written: report.written.len(),
            unchanged: report.unchanged.len(),
            errors: report.error_count(),
            from: report.starting_watermark.position(),
            watermark: report.final_watermark().position(),
        });
        events
    }

    /// Convert to JSON string with "command": "sync" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("sync"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
