use std::sync::mpsc;

use anyhow::{Context, Result};
use marginalia::application::{
    ChannelEventSource, Signal, SyncState, SystemClock, WatchEvent, WatchExit, WatchUseCase,
};
use marginalia::config::Config;
use marginalia::infrastructure::{JsonWatermarkStore, SourceWatcher, VaultLock};
use tracing::info;

use super::{build_pass, timestamp, vault_dir};
use crate::ui::context::UiContext;
use crate::ui::views::watch::{render_watch_event, render_watch_header};

pub fn cmd_watch(config: &Config, ui: UiContext) -> Result<()> {
    let vault = vault_dir(config)?;
    let _lock = VaultLock::acquire(&vault)?;

    // Always the live file, even when passes read a staged copy
    let watched = config.source.annotation_location().resolve()?;
    let pass = build_pass(config, &vault)?;
    let mut state =
        SyncState::load(&JsonWatermarkStore::new(&vault)).with_watched_path(&watched);

    let (tx, rx) = mpsc::channel();
    let shutdown_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(Signal::Shutdown);
    })
    .context("failed to install Ctrl+C handler")?;
    let _watcher = SourceWatcher::start(&watched, tx)?;

    let timing = config.watch.timing();
    if !ui.json {
        print!(
            "{}",
            render_watch_header(
                &watched.display().to_string(),
                &vault.display().to_string(),
                timing,
                ui.color,
                ui.unicode
            )
        );
    }

    let use_case = WatchUseCase::new(pass, timing)
        .with_vault_label(vault.display().to_string());
    let mut events = ChannelEventSource::new(rx);

    let exit = use_case.run(&mut state, &mut events, &SystemClock, |event| {
        if ui.json {
            println!("{}", event.to_json());
            return;
        }
        let rendered = render_watch_event(&timestamp(), &event, ui.color, ui.unicode);
        match event {
            WatchEvent::Error { .. } | WatchEvent::SyncFailed { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    });

    match exit {
        WatchExit::Cancelled => info!(watermark = %state.watermark(), "watch cancelled"),
        WatchExit::Disconnected => info!(watermark = %state.watermark(), "watch channel closed"),
    }
    Ok(())
}
