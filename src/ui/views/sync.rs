use std::path::Path;

use marginalia::application::sync::{PassMode, SyncReport, WatermarkUpdate};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_sync_header(
    vault: &Path,
    mode: PassMode,
    watermark: i64,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let title = match mode {
        PassMode::Incremental => "Marginalia Sync",
        PassMode::Full => "Marginalia Sync (full export)",
    };
    let mut header = CommandHeader::new(Icon::Book, title);
    header.add("Vault", vault.display().to_string());
    header.add("Watermark", watermark.to_string());
    header.render(supports_color, supports_unicode)
}

pub fn render_sync_report(
    report: &SyncReport,
    verbose: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut out = String::new();

    if verbose {
        for path in &report.written {
            out.push_str(&format!(
                "  {} {}\n",
                Icon::Arrow.colored(supports_color, supports_unicode),
                path.display()
            ));
        }
    }

    for message in &report.export_errors {
        out.push_str(&format!(
            "{} {}\n",
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ));
    }

    if let WatermarkUpdate::SaveFailed { attempted, message } = &report.watermark {
        out.push_str(&format!(
            "{} Could not save watermark {}: {}\n",
            Icon::Error.colored(supports_color, supports_unicode),
            attempted,
            message
        ));
    }

    if report.is_empty() {
        out.push_str(&format!(
            "{} No new highlights\n",
            Icon::Success.colored(supports_color, supports_unicode)
        ));
        return out;
    }

    let icon = if report.is_success() {
        Icon::Success
    } else {
        Icon::Warning
    };
    out.push_str(&format!(
        "{} Exported {} highlights from {} books ({} written, {} unchanged)\n",
        icon.colored(supports_color, supports_unicode),
        report.records,
        report.books,
        report.written.len(),
        report.unchanged.len()
    ));

    match &report.watermark {
        WatermarkUpdate::Advanced(next) => out.push_str(&format!(
            "{}\n",
            ColoredText::dim(format!(
                "Watermark {} -> {}",
                report.starting_watermark, next
            ))
            .render(supports_color)
        )),
        WatermarkUpdate::Unchanged => out.push_str(&format!(
            "{}\n",
            ColoredText::dim(format!("Watermark {}", report.starting_watermark))
                .render(supports_color)
        )),
        WatermarkUpdate::SaveFailed { .. } => {}
    }

    if report.error_count() > 0 {
        out.push_str(&format!(
            "{}\n",
            ColoredText::warning(format!("{} errors", report.error_count())).render(supports_color)
        ));
    }

    out
}

pub fn render_sync_failure(message: &str, supports_color: bool, supports_unicode: bool) -> String {
    format!(
        "{} Sync failed: {}\n",
        Icon::Error.colored(supports_color, supports_unicode),
        ColoredText::error(message).render(supports_color)
    )
}
