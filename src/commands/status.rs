use std::path::Path;

use anyhow::Result;
use marginalia::application::SyncState;
use marginalia::config::Config;
use marginalia::infrastructure::{DbLocation, JsonWatermarkStore, MarkdownArtifactWriter};

use super::vault_dir;
use crate::ui::context::UiContext;
use crate::ui::views::status::{render_status, SourceStatus, StatusView};

/// Read-only summary; takes no lock
pub fn cmd_status(config: &Config, config_file: Option<&Path>, ui: UiContext) -> Result<()> {
    let vault = vault_dir(config)?;
    let store = JsonWatermarkStore::new(&vault);
    let writer = MarkdownArtifactWriter::new(&vault, &config.vault.subdir);

    let view = StatusView {
        vault: vault.display().to_string(),
        state_file: store.path().display().to_string(),
        watermark: SyncState::load(&store).watermark().position(),
        artifact_dir: writer.dir().display().to_string(),
        artifacts: count_artifacts(writer.dir()),
        annotation_db: source_status(&config.source.annotation_location()),
        library_db: source_status(&config.source.library_location()),
        staging_dir: config
            .source
            .staging_dir
            .as_ref()
            .map(|d| d.display().to_string()),
        config_file: config_file.map(|p| p.display().to_string()),
    };

    if ui.json {
        println!("{}", view.to_json());
    } else {
        print!("{}", render_status(&view, ui.color, ui.unicode));
    }
    Ok(())
}

fn source_status(location: &DbLocation) -> SourceStatus {
    match location.resolve() {
        Ok(path) => SourceStatus::Found {
            path: path.display().to_string(),
        },
        Err(e) => SourceStatus::Missing {
            message: e.to_string(),
        },
    }
}

fn count_artifacts(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
        .count()
}
