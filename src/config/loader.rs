//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{MarginaliaError, MarginaliaResult};
use crate::infrastructure::fs::marginalia_config_dir;

use super::types::Config;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "marginalia.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// A resolved configuration and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from; `None` for built-in defaults
    pub origin: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> MarginaliaResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path).map_err(|e| MarginaliaError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| MarginaliaError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the configuration for one invocation.
///
/// Lookup order: `explicit` (must exist), `<cwd>/marginalia.toml`,
/// `<config_dir>/marginalia/config.toml`, built-in defaults. Environment
/// overrides and `~` expansion are applied on top; CLI flags are left to the
/// caller.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> MarginaliaResult<LoadedConfig> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => [
            Some(cwd.join(LOCAL_CONFIG_FILE)),
            marginalia_config_dir().map(|dir| dir.join("marginalia").join("config.toml")),
        ]
        .into_iter()
        .flatten()
        .find(|path| path.is_file()),
    };

    let (config, warnings) = match &candidate {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_with_warnings(path)?
        }
        None => {
            debug!("no config file found, using defaults");
            (Config::default(), Vec::new())
        }
    };

    let config = with_env_overrides(config).expanded();
    let origin_for_errors = candidate
        .clone()
        .unwrap_or_else(|| PathBuf::from("<defaults>"));
    config.validate(&origin_for_errors)?;

    Ok(LoadedConfig {
        config,
        origin: candidate,
        warnings,
    })
}

/// Apply environment variable overrides (MARGINALIA_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub(crate) fn apply_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let number = |name: &str| {
        let raw = value(name)?;
        match raw.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!(var = name, value = %raw, "ignoring non-numeric environment override");
                None
            }
        }
    };

    if let Some(vault) = value("MARGINALIA_VAULT") {
        config.vault.path = Some(PathBuf::from(vault));
    }

    if let Some(dir) = value("MARGINALIA_STAGING_DIR") {
        config.source.staging_dir = Some(PathBuf::from(dir));
    }

    if let Some(ms) = number("MARGINALIA_DEBOUNCE_MS") {
        config.watch.debounce_ms = ms;
    }

    if let Some(secs) = number("MARGINALIA_TICK_SECS") {
        config.watch.tick_secs = secs;
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "source",
        "annotation_dir",
        "annotation_file",
        "library_dir",
        "library_file",
        "attach_alias",
        "staging_dir",
        "vault",
        "path",
        "subdir",
        "template",
        "watch",
        "debounce_ms",
        "tick_secs",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
