//! File-system notifications for the annotation database
//!
//! Watches the parent directory non-recursively (SQLite replaces and
//! recreates files, which a direct file watch can miss) and forwards only
//! create/data-modify events for the exact database path.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::application::Signal;
use crate::error::{MarginaliaError, MarginaliaResult};

/// Whether `event` is a change to `watched`
pub fn is_relevant(event: &Event, watched: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    );
    kind_matches && event.paths.iter().any(|p| same_file(p, watched))
}

fn same_file(candidate: &Path, watched: &Path) -> bool {
    if candidate == watched {
        return true;
    }
    match (candidate.canonicalize(), watched.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Live watch on one file; dropping it releases the OS watch
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl SourceWatcher {
    /// Start watching `path`, sending `Signal::SourceChanged` /
    /// `Signal::WatcherError` into `tx`
    pub fn start(path: &Path, tx: Sender<Signal>) -> MarginaliaResult<Self> {
        let watched = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let parent = watched
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                MarginaliaError::source_unavailable(format!(
                    "cannot watch {}: no parent directory",
                    path.display()
                ))
            })?;

        let target = watched.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let signal = match res {
                    Ok(event) if is_relevant(&event, &target) => {
                        Signal::SourceChanged(target.clone())
                    }
                    Ok(event) => {
                        debug!(kind = ?event.kind, paths = ?event.paths, "ignored fs event");
                        return;
                    }
                    Err(e) => Signal::WatcherError(e.to_string()),
                };
                let _ = tx.send(signal);
            },
            Config::default(),
        )?;
        watcher.watch(&parent, RecursiveMode::NonRecursive)?;
        debug!(path = %watched.display(), dir = %parent.display(), "watching source");

        Ok(Self {
            _watcher: watcher,
            path: watched,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
