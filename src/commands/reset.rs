use anyhow::{Context, Result};
use marginalia::application::SyncState;
use marginalia::config::Config;
use marginalia::domain::ports::WatermarkStore;
use marginalia::domain::value_objects::Watermark;
use marginalia::infrastructure::{JsonWatermarkStore, VaultLock};
use tracing::info;

use super::vault_dir;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;

/// Overwrite the persisted watermark. Waits for nothing: fails if a sync or
/// watch holds the vault.
pub fn cmd_reset(config: &Config, to: i64, ui: UiContext) -> Result<()> {
    let vault = vault_dir(config)?;
    let _lock = VaultLock::acquire(&vault)?;

    let store = JsonWatermarkStore::new(&vault);
    let from = SyncState::load(&store).watermark();
    let to = Watermark::new(to);
    store
        .save(to)
        .with_context(|| format!("failed to write {}", store.path().display()))?;
    info!(%from, %to, "watermark reset");

    if ui.json {
        println!(
            "{}",
            serde_json::json!({
                "command": "reset",
                "event": "reset",
                "from": from.position(),
                "watermark": to.position(),
            })
        );
    } else {
        println!(
            "{} Watermark reset: {} -> {}",
            Icon::Success.colored(ui.color, ui.unicode),
            from,
            to
        );
    }
    Ok(())
}
