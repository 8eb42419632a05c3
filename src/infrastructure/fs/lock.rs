//! Advisory vault lock
//!
//! Held for the life of a `sync` or `watch` command so two processes never
//! advance the same watermark concurrently.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::{MarginaliaError, MarginaliaResult};

/// Lock file name inside the vault
pub const LOCK_FILE: &str = ".marginalia.lock";

/// Exclusive lock on `<vault>/.marginalia.lock`, released on drop
#[derive(Debug)]
pub struct VaultLock {
    file: File,
    path: PathBuf,
}

impl VaultLock {
    /// Take the lock without blocking; fails with `VaultLocked` if held elsewhere
    pub fn acquire(vault: &Path) -> MarginaliaResult<Self> {
        fs::create_dir_all(vault)?;
        let path = vault.join(LOCK_FILE);
        let file = File::create(&path)?;
        file.try_lock_exclusive()
            .map_err(|err| lock_error(vault, err))?;
        debug!(path = %path.display(), "vault lock acquired");
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Contention becomes `VaultLocked`; any other failure stays an I/O error
fn lock_error(vault: &Path, err: io::Error) -> MarginaliaError {
    let contended = err.kind() == io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error();
    if contended {
        MarginaliaError::VaultLocked {
            path: vault.to_path_buf(),
        }
    } else {
        MarginaliaError::Io(err)
    }
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
