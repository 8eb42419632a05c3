use marginalia::application::watch::{SyncTrigger, WatchEvent, WatchTiming};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_watch_header(
    source: &str,
    vault: &str,
    timing: WatchTiming,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Watch, "Marginalia Watch");
    header.add("Source", source);
    header.add("Vault", vault);
    header.add(
        "Timing",
        format!(
            "debounce {}ms, periodic every {}s",
            timing.debounce.as_millis(),
            timing.tick_interval.as_secs()
        ),
    );
    header.add("Hint", "Press Ctrl+C to stop");
    header.render(supports_color, supports_unicode)
}

fn trigger_label(trigger: SyncTrigger) -> &'static str {
    match trigger {
        SyncTrigger::Startup => "startup",
        SyncTrigger::SourceChanged => "change",
        SyncTrigger::Periodic => "periodic",
    }
}

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = ColoredText::dim(format!("[{}]", timestamp)).render(supports_color);

    match event {
        WatchEvent::WatchStarted { watermark, .. } => format!(
            "{} {} Watching from watermark {}\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode),
            watermark
        ),
        WatchEvent::SourceChanged { path } => format!(
            "{} {} Changed: {}\n",
            prefix,
            Icon::Arrow.colored(supports_color, supports_unicode),
            path
        ),
        WatchEvent::SyncStarted { trigger } => format!(
            "{} {} Syncing ({})...\n",
            prefix,
            Icon::Progress.colored(supports_color, supports_unicode),
            trigger_label(*trigger)
        ),
        WatchEvent::SyncComplete {
            records,
            books,
            written,
            unchanged,
            errors,
            watermark,
            ..
        } => {
            if *records == 0 {
                return format!(
                    "{} {} No new highlights\n",
                    prefix,
                    Icon::Success.colored(supports_color, supports_unicode)
                );
            }

            let icon = if *errors > 0 {
                Icon::Warning
            } else {
                Icon::Success
            }
            .colored(supports_color, supports_unicode);

            let mut line = format!(
                "{} {} Sync: {} highlights, {} books ({} written, {} unchanged)",
                prefix, icon, records, books, written, unchanged
            );
            if *errors > 0 {
                line.push_str(&format!(", {} errors", errors));
            }
            line.push_str(&format!(", watermark {}\n", watermark));
            line
        }
        WatchEvent::SyncFailed { message, .. } => format!(
            "{} {} Sync failed: {}\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ),
        WatchEvent::Error { message } => format!(
            "{} {} Error: {}\n",
            prefix,
            Icon::Error.colored(supports_color, supports_unicode),
            message
        ),
        WatchEvent::Shutdown => format!(
            "\n{} {} Watch stopped.\n",
            prefix,
            Icon::Watch.colored(supports_color, supports_unicode)
        ),
    }
}
