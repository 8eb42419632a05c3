//! File System helpers
//!
//! Atomic writes, content hashing, home expansion and the vault lock.

mod atomic;
mod home;
mod lock;

pub use atomic::{hash_bytes, hash_file, write_atomic};
pub use home::{expand_home, marginalia_config_dir, marginalia_home_dir, MARGINALIA_TEST_HOME_VAR};
pub use lock::{VaultLock, LOCK_FILE};
