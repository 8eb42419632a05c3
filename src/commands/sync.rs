use anyhow::Result;
use marginalia::application::{PassMode, SyncEvent, SyncState};
use marginalia::config::Config;
use marginalia::infrastructure::{JsonWatermarkStore, VaultLock};
use tracing::debug;

use super::{build_pass, vault_dir};
use crate::ui::context::UiContext;
use crate::ui::views::sync::{render_sync_failure, render_sync_header, render_sync_report};

/// One pass, then exit. Non-zero exit when the pass aborts or the watermark
/// cannot be saved.
pub fn cmd_sync(config: &Config, full: bool, ui: UiContext, verbose: u8) -> Result<()> {
    let vault = vault_dir(config)?;
    let lock = VaultLock::acquire(&vault)?;
    debug!(lock = %lock.path().display(), "running one-shot sync");

    let pass = build_pass(config, &vault)?;
    let mut state = SyncState::load(&JsonWatermarkStore::new(&vault));
    let mode = if full {
        PassMode::Full
    } else {
        PassMode::Incremental
    };

    if ui.json {
        println!(
            "{}",
            SyncEvent::Start {
                mode,
                vault: vault.display().to_string(),
                watermark: state.watermark().position(),
            }
            .to_json()
        );
    } else {
        print!(
            "{}",
            render_sync_header(
                &vault,
                mode,
                state.watermark().position(),
                ui.color,
                ui.unicode
            )
        );
    }

    let result = match mode {
        PassMode::Incremental => pass.run(&mut state),
        PassMode::Full => pass.run_full(&mut state),
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if ui.json {
                println!(
                    "{}",
                    SyncEvent::Failed {
                        message: e.to_string()
                    }
                    .to_json()
                );
            } else {
                eprint!("{}", render_sync_failure(&e.to_string(), ui.color, ui.unicode));
            }
            drop(lock);
            std::process::exit(1);
        }
    };

    if ui.json {
        for event in SyncEvent::from_report(&report) {
            println!("{}", event.to_json());
        }
    } else {
        print!(
            "{}",
            render_sync_report(&report, verbose > 0, ui.color, ui.unicode)
        );
    }

    // Export errors alone do not fail the command
    if report.save_failed() {
        drop(lock);
        std::process::exit(1);
    }

    Ok(())
}
