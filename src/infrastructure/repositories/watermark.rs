//! JSON Watermark Repository
//!
//! Implements the WatermarkStore port as `<vault>/marginalia_state.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::WatermarkStore;
use crate::domain::value_objects::Watermark;
use crate::error::MarginaliaResult;
use crate::infrastructure::fs::write_atomic;

/// State file name inside the vault
pub const STATE_FILE: &str = "marginalia_state.json";

/// On-disk layout of the state file
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StateFile {
    last_pk: i64,
}

/// Watermark persisted as pretty-printed JSON in the vault
#[derive(Debug, Clone)]
pub struct JsonWatermarkStore {
    path: PathBuf,
}

impl JsonWatermarkStore {
    /// Store for the given vault directory
    pub fn new(vault: &Path) -> Self {
        Self {
            path: vault.join(STATE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WatermarkStore for JsonWatermarkStore {
    fn load(&self) -> MarginaliaResult<Watermark> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Watermark::ZERO),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<StateFile>(&content) {
            Ok(state) => Ok(Watermark::new(state.last_pk)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed state file, starting from 0"
                );
                Ok(Watermark::ZERO)
            }
        }
    }

    fn save(&self, watermark: Watermark) -> MarginaliaResult<()> {
        let state = StateFile {
            last_pk: watermark.position(),
        };
        let mut json = serde_json::to_string_pretty(&state).map_err(std::io::Error::other)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }
}
