//! Home and config directory resolution with test isolation support.
//!
//! `dirs::home_dir()` ignores `HOME` on some platforms, so integration tests
//! set `MARGINALIA_TEST_HOME` instead. When it is set, both `~` expansion and
//! the per-user config directory resolve under it.

use std::path::{Path, PathBuf};

/// Environment variable for test isolation of home directory.
pub const MARGINALIA_TEST_HOME_VAR: &str = "MARGINALIA_TEST_HOME";

/// Home directory used for `~` expansion and config lookup
pub fn marginalia_home_dir() -> Option<PathBuf> {
    std::env::var(MARGINALIA_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

/// Per-user configuration directory (`~/.config` on Linux, `~/Library/Application Support` on macOS)
pub fn marginalia_config_dir() -> Option<PathBuf> {
    match std::env::var(MARGINALIA_TEST_HOME_VAR) {
        Ok(home) => Some(PathBuf::from(home).join(".config")),
        Err(_) => dirs::config_dir(),
    }
}

/// Expand a leading `~` or `~/` to the home directory.
///
/// Paths without a leading tilde, or with `~user` forms, are returned as-is.
pub fn expand_home(path: &Path) -> PathBuf {
    let Some(rest) = path.to_str().and_then(|p| p.strip_prefix('~')) else {
        return path.to_path_buf();
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        return path.to_path_buf();
    }
    match marginalia_home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => path.to_path_buf(),
    }
}
