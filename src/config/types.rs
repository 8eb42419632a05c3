//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::watch::{WatchTiming, DEFAULT_DEBOUNCE_MS, DEFAULT_TICK_SECS};
use crate::error::{MarginaliaError, MarginaliaResult};
use crate::infrastructure::fs::expand_home;
use crate::infrastructure::source::{is_valid_alias, DbLocation, DEFAULT_ATTACH_ALIAS};
use crate::infrastructure::writer::DEFAULT_SUBDIR;

use super::loader::{self, ConfigWarning};

/// Longest accepted debounce window (one hour)
pub const MAX_DEBOUNCE_MS: u64 = 60 * 60 * 1000;

/// Longest accepted periodic sync interval (one week)
pub const MAX_TICK_SECS: u64 = 7 * 24 * 60 * 60;

const APPLE_BOOKS_DOCUMENTS: &str = "~/Library/Containers/com.apple.iBooksX/Data/Documents";

/// Where the Apple Books databases live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_annotation_dir")]
    pub annotation_dir: PathBuf,

    /// File-name glob inside `annotation_dir`
    #[serde(default = "default_annotation_file")]
    pub annotation_file: String,

    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,

    /// File-name glob inside `library_dir`
    #[serde(default = "default_library_file")]
    pub library_file: String,

    /// Schema name the annotation database is attached under
    #[serde(default = "default_attach_alias")]
    pub attach_alias: String,

    /// Query private copies in this directory instead of the live files
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            annotation_dir: default_annotation_dir(),
            annotation_file: default_annotation_file(),
            library_dir: default_library_dir(),
            library_file: default_library_file(),
            attach_alias: default_attach_alias(),
            staging_dir: None,
        }
    }
}

impl SourceConfig {
    pub fn annotation_location(&self) -> DbLocation {
        DbLocation::new(&self.annotation_dir, &self.annotation_file)
    }

    pub fn library_location(&self) -> DbLocation {
        DbLocation::new(&self.library_dir, &self.library_file)
    }
}

fn default_annotation_dir() -> PathBuf {
    PathBuf::from(APPLE_BOOKS_DOCUMENTS).join("AEAnnotation")
}

fn default_annotation_file() -> String {
    "AEAnnotation_*.sqlite".to_string()
}

fn default_library_dir() -> PathBuf {
    PathBuf::from(APPLE_BOOKS_DOCUMENTS).join("BKLibrary")
}

fn default_library_file() -> String {
    "BKLibrary-*.sqlite".to_string()
}

fn default_attach_alias() -> String {
    DEFAULT_ATTACH_ALIAS.to_string()
}

/// Target vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault root; holds the state file and the artifact directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Artifact directory relative to the vault root
    #[serde(default = "default_subdir")]
    pub subdir: String,

    /// User template for book artifacts; the built-in layout when unset
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: None,
            subdir: default_subdir(),
            template: None,
        }
    }
}

fn default_subdir() -> String {
    DEFAULT_SUBDIR.to_string()
}

/// Watch loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            tick_secs: default_tick_secs(),
        }
    }
}

impl WatchConfig {
    pub fn timing(&self) -> WatchTiming {
        WatchTiming::new(
            Duration::from_millis(self.debounce_ms),
            Duration::from_secs(self.tick_secs),
        )
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> MarginaliaResult<Self> {
        Ok(Self::load_with_warnings(path)?.0)
    }

    /// Load configuration and return non-fatal warnings (e.g. unknown keys)
    pub fn load_with_warnings(path: &Path) -> MarginaliaResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Expand `~` in every configured path
    pub fn expanded(mut self) -> Self {
        self.source.annotation_dir = expand_home(&self.source.annotation_dir);
        self.source.library_dir = expand_home(&self.source.library_dir);
        self.source.staging_dir = self.source.staging_dir.as_deref().map(expand_home);
        self.vault.path = self.vault.path.as_deref().map(expand_home);
        self.vault.template = self.vault.template.as_deref().map(expand_home);
        self
    }

    /// Reject values no command can run with
    pub fn validate(&self, origin: &Path) -> MarginaliaResult<()> {
        let invalid = |message: String| MarginaliaError::Config {
            file: origin.to_path_buf(),
            message,
        };
        if !is_valid_alias(&self.source.attach_alias) {
            return Err(invalid(format!(
                "source.attach_alias '{}' must be a plain identifier",
                self.source.attach_alias
            )));
        }
        if !(1..=MAX_DEBOUNCE_MS).contains(&self.watch.debounce_ms) {
            return Err(invalid(format!(
                "watch.debounce_ms must be between 1 and {MAX_DEBOUNCE_MS}"
            )));
        }
        if !(1..=MAX_TICK_SECS).contains(&self.watch.tick_secs) {
            return Err(invalid(format!(
                "watch.tick_secs must be between 1 and {MAX_TICK_SECS}"
            )));
        }
        if self.vault.subdir.is_empty() || Path::new(&self.vault.subdir).is_absolute() {
            return Err(invalid(format!(
                "vault.subdir '{}' must be a relative directory name",
                self.vault.subdir
            )));
        }
        Ok(())
    }

    /// The vault root, or `MissingSetting` when neither file, env nor CLI set it
    pub fn vault_path(&self) -> MarginaliaResult<&Path> {
        self.vault
            .path
            .as_deref()
            .ok_or_else(|| MarginaliaError::MissingSetting {
                key: "vault.path".to_string(),
            })
    }
}
