//! Configuration module for Marginalia
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (MARGINALIA_*)
//! 3. Config file (`--config`, `./marginalia.toml`, or
//!    `<config_dir>/marginalia/config.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{discover, ConfigWarning, LoadedConfig, LOCAL_CONFIG_FILE};
pub use types::{Config, SourceConfig, VaultConfig, WatchConfig, MAX_DEBOUNCE_MS, MAX_TICK_SECS};
