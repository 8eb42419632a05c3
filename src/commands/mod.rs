//! Command handlers
//!
//! Each handler takes the resolved config, wires the infrastructure
//! adapters into the application use cases, and prints human or NDJSON
//! output.

pub mod reset;
pub mod status;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marginalia::application::SyncPass;
use marginalia::config::Config;
use marginalia::infrastructure::{
    ArtifactTemplate, DbStager, JsonWatermarkStore, MarkdownArtifactWriter, SqliteHighlightSource,
};

/// The production sync pass
pub type MarginaliaPass = SyncPass<SqliteHighlightSource, MarkdownArtifactWriter, JsonWatermarkStore>;

/// The vault root, with a hint when it is not configured anywhere
pub fn vault_dir(config: &Config) -> Result<PathBuf> {
    let vault = config.vault_path().with_context(|| {
        "set [vault] path in marginalia.toml, MARGINALIA_VAULT, or pass --vault"
    })?;
    Ok(vault.to_path_buf())
}

pub fn build_source(config: &Config) -> Result<SqliteHighlightSource> {
    let source = SqliteHighlightSource::new(
        config.source.annotation_location(),
        config.source.library_location(),
        config.source.attach_alias.as_str(),
    )?;
    Ok(match &config.source.staging_dir {
        Some(dir) => source.with_staging(DbStager::new(dir)),
        None => source,
    })
}

pub fn build_writer(config: &Config, vault: &Path) -> Result<MarkdownArtifactWriter> {
    let writer = MarkdownArtifactWriter::new(vault, &config.vault.subdir);
    Ok(match &config.vault.template {
        Some(path) => writer.with_template(ArtifactTemplate::load(path)?),
        None => writer,
    })
}

pub fn build_pass(config: &Config, vault: &Path) -> Result<MarginaliaPass> {
    Ok(SyncPass::new(
        build_source(config)?,
        build_writer(config, vault)?,
        JsonWatermarkStore::new(vault),
    ))
}

/// Wall-clock prefix for human event lines
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
