//! Sidecar lock files.
//!
//! Files that get replaced by rename can't carry their own lock: a writer
//! waiting on the old inode would resume against an unlinked file. Every
//! reader and writer of `meals.jsonl` therefore locks `meals.jsonl.lock`
//! instead, which is never renamed.

use crate::Result;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Held advisory lock on the sidecar of a data file; released on drop
#[derive(Debug)]
pub(crate) struct PathLock {
    file: File,
}

impl PathLock {
    /// Block until no other reader or writer holds the lock
    pub(crate) fn exclusive(target: &Path) -> Result<Self> {
        let file = open_sidecar(target)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    /// Block until no writer holds the lock
    pub(crate) fn shared(target: &Path) -> Result<Self> {
        let file = open_sidecar(target)?;
        file.lock_shared()?;
        Ok(Self { file })
    }
}

impl Drop for PathLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release lock: {}", e);
        }
    }
}

/// `profile.json` -> `profile.json.lock`
pub(crate) fn sidecar_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".lock");
    target.with_file_name(name)
}

fn open_sidecar(target: &Path) -> Result<File> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(sidecar_path(target))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/data/kcal/meals.jsonl")),
            PathBuf::from("/data/kcal/meals.jsonl.lock")
        );
    }

    #[test]
    fn test_exclusive_lock_blocks_others_until_dropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("profile.json");

        let guard = PathLock::exclusive(&target).unwrap();
        let other = File::open(sidecar_path(&target)).unwrap();
        assert!(other.try_lock_shared().is_err());

        drop(guard);
        assert!(other.try_lock_exclusive().is_ok());
        other.unlock().unwrap();
    }

    #[test]
    fn test_shared_locks_coexist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("meals.jsonl");

        let _first = PathLock::shared(&target).unwrap();
        let _second = PathLock::shared(&target).unwrap();
        let other = File::open(sidecar_path(&target)).unwrap();
        assert!(other.try_lock_exclusive().is_err());
    }

    #[test]
    fn test_creates_missing_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("nested/dir/presets.json");

        let _guard = PathLock::exclusive(&target).unwrap();
        assert!(sidecar_path(&target).exists());
    }
}
