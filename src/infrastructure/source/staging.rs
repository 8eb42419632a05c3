//! Staged copies of the live databases
//!
//! Apple Books keeps its databases open; querying a private copy avoids
//! contending with it for locks. The copy is refreshed whenever the live file
//! is newer, so each pass still sees the latest highlights.
//!
//! A refresh copies the database and its WAL into a scratch directory, then
//! renames them into place. If the live files change while being copied the
//! copy is retried; after the last attempt the snapshot is installed anyway
//! and may pair a database with a slightly newer WAL. The next pass stages
//! again, so such a snapshot is never kept past one pass.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::error::{MarginaliaError, MarginaliaResult};

/// SQLite companion files that carry not-yet-checkpointed writes
const COMPANION_SUFFIXES: [&str; 1] = ["-wal"];

/// Copies attempted before accepting a snapshot taken mid-write
const SNAPSHOT_ATTEMPTS: usize = 3;

/// Copies live database files into a staging directory on demand
#[derive(Debug, Clone)]
pub struct DbStager {
    dir: PathBuf,
}

impl DbStager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the staged path for `live`, copying first if the staged copy is
    /// missing or older than the live file.
    pub fn stage(&self, live: &Path) -> MarginaliaResult<PathBuf> {
        let name = live.file_name().ok_or_else(|| {
            MarginaliaError::source_unavailable(format!("not a file: {}", live.display()))
        })?;
        let staged = self.dir.join(name);

        let live_mtime = modified(live)?.ok_or_else(|| {
            MarginaliaError::source_unavailable(format!("{} does not exist", live.display()))
        })?;
        let fresh = matches!(modified(&staged)?, Some(staged_mtime) if staged_mtime >= live_mtime)
            && companions_fresh(live, &staged)?;

        if !fresh {
            fs::create_dir_all(&self.dir).map_err(MarginaliaError::source_unavailable)?;
            self.copy_snapshot(live, &staged)?;
            debug!(live = %live.display(), staged = %staged.display(), "staged database");
        }
        Ok(staged)
    }

    fn copy_snapshot(&self, live: &Path, staged: &Path) -> MarginaliaResult<()> {
        for attempt in 1..=SNAPSHOT_ATTEMPTS {
            let before = live_mtimes(live)?;
            let scratch = tempfile::Builder::new()
                .prefix(".marginalia-stage")
                .tempdir_in(&self.dir)
                .map_err(MarginaliaError::source_unavailable)?;
            let copied = scratch.path().join(staged.file_name().unwrap_or_default());
            copy_with_companions(live, &copied)?;

            let settled = live_mtimes(live)? == before;
            if settled || attempt == SNAPSHOT_ATTEMPTS {
                if !settled {
                    warn!(live = %live.display(), "database kept changing while staging; using last copy");
                }
                return install(&copied, staged);
            }
            debug!(attempt, live = %live.display(), "database changed during copy, retrying");
        }
        Ok(())
    }
}

/// Modification times of the database and each companion
fn live_mtimes(live: &Path) -> MarginaliaResult<Vec<Option<SystemTime>>> {
    let mut times = vec![modified(live)?];
    for suffix in COMPANION_SUFFIXES {
        times.push(modified(&companion(live, suffix))?);
    }
    Ok(times)
}

/// Rename a scratch copy and its companions over the staged files
fn install(copied: &Path, staged: &Path) -> MarginaliaResult<()> {
    fs::rename(copied, staged).map_err(MarginaliaError::source_unavailable)?;
    for suffix in COMPANION_SUFFIXES {
        let from = companion(copied, suffix);
        let to = companion(staged, suffix);
        if from.exists() {
            fs::rename(&from, &to).map_err(MarginaliaError::source_unavailable)?;
        } else if to.exists() {
            fs::remove_file(&to).map_err(MarginaliaError::source_unavailable)?;
        }
    }
    Ok(())
}

fn modified(path: &Path) -> MarginaliaResult<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => meta
            .modified()
            .map(Some)
            .map_err(MarginaliaError::source_unavailable),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MarginaliaError::source_unavailable(e)),
    }
}

fn companion(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn companions_fresh(live: &Path, staged: &Path) -> MarginaliaResult<bool> {
    for suffix in COMPANION_SUFFIXES {
        let live_mtime = modified(&companion(live, suffix))?;
        let staged_mtime = modified(&companion(staged, suffix))?;
        let fresh = match (live_mtime, staged_mtime) {
            (None, None) => true,
            (Some(l), Some(s)) => s >= l,
            _ => false,
        };
        if !fresh {
            return Ok(false);
        }
    }
    Ok(true)
}

fn copy_with_companions(live: &Path, target: &Path) -> MarginaliaResult<()> {
    fs::copy(live, target).map_err(MarginaliaError::source_unavailable)?;
    for suffix in COMPANION_SUFFIXES {
        let live_companion = companion(live, suffix);
        if live_companion.exists() {
            fs::copy(&live_companion, companion(target, suffix))
                .map_err(MarginaliaError::source_unavailable)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = fs::OpenOptions::new().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[test]
    fn stage_copies_when_missing() {
        let live_dir = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let live = live_dir.path().join("AEAnnotation_v1.sqlite");
        fs::write(&live, "v1").unwrap();

        let staged = DbStager::new(staging.path().join("stage")).stage(&live).unwrap();

        assert_eq!(staged, staging.path().join("stage/AEAnnotation_v1.sqlite"));
        assert_eq!(fs::read_to_string(&staged).unwrap(), "v1");
    }

    #[test]
    fn stage_refreshes_only_when_live_is_newer() {
        let live_dir = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let live = live_dir.path().join("lib.sqlite");
        let stager = DbStager::new(staging.path());
        let t0 = SystemTime::now() - Duration::from_secs(3600);

        fs::write(&live, "v1").unwrap();
        set_mtime(&live, t0);
        let staged = stager.stage(&live).unwrap();

        // Same mtime on the live file: staged copy is kept as-is
        fs::write(&staged, "local edit").unwrap();
        set_mtime(&staged, t0 + Duration::from_secs(10));
        stager.stage(&live).unwrap();
        assert_eq!(fs::read_to_string(&staged).unwrap(), "local edit");

        // Newer live file: refreshed
        fs::write(&live, "v2").unwrap();
        set_mtime(&live, t0 + Duration::from_secs(60));
        stager.stage(&live).unwrap();
        assert_eq!(fs::read_to_string(&staged).unwrap(), "v2");
    }

    #[test]
    fn stage_copies_wal_companion() {
        let live_dir = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let live = live_dir.path().join("ann.sqlite");
        fs::write(&live, "db").unwrap();
        fs::write(live_dir.path().join("ann.sqlite-wal"), "wal").unwrap();

        DbStager::new(staging.path()).stage(&live).unwrap();

        assert_eq!(
            fs::read_to_string(staging.path().join("ann.sqlite-wal")).unwrap(),
            "wal"
        );
    }

    #[test]
    fn stage_installs_snapshot_without_leaving_scratch_files() {
        let live_dir = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let live = live_dir.path().join("ann.sqlite");
        fs::write(&live, "db").unwrap();
        fs::write(live_dir.path().join("ann.sqlite-wal"), "wal").unwrap();

        DbStager::new(staging.path()).stage(&live).unwrap();

        let mut names: Vec<_> = fs::read_dir(staging.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["ann.sqlite", "ann.sqlite-wal"]);
    }

    #[test]
    fn stage_drops_stale_wal_once_checkpointed() {
        let live_dir = tempdir().unwrap();
        let staging = tempdir().unwrap();
        let live = live_dir.path().join("ann.sqlite");
        let live_wal = live_dir.path().join("ann.sqlite-wal");
        let stager = DbStager::new(staging.path());
        let t0 = SystemTime::now() - Duration::from_secs(3600);

        fs::write(&live, "db").unwrap();
        fs::write(&live_wal, "wal").unwrap();
        set_mtime(&live, t0);
        stager.stage(&live).unwrap();

        fs::remove_file(&live_wal).unwrap();
        fs::write(&live, "db+wal").unwrap();
        stager.stage(&live).unwrap();

        assert_eq!(fs::read_to_string(staging.path().join("ann.sqlite")).unwrap(), "db+wal");
        assert!(!staging.path().join("ann.sqlite-wal").exists());
    }

    #[test]
    fn stage_missing_live_file_is_source_unavailable() {
        let staging = tempdir().unwrap();
        let err = DbStager::new(staging.path())
            .stage(&staging.path().join("gone.sqlite"))
            .unwrap_err();
        assert!(matches!(err, MarginaliaError::SourceUnavailable { .. }));
    }
}
