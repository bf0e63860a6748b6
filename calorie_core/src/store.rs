//! Profile persistence.
//!
//! The profile lives in one pretty-printed JSON file. Readers take the shared
//! sidecar lock; `update` and friends hold the exclusive lock across the whole
//! read-modify-write so concurrent commands can't drop each other's changes.

use crate::lock::PathLock;
use crate::{Error, Profile, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

impl Profile {
    /// Load the profile
    ///
    /// Returns `None` if the file doesn't exist, or if it can't be parsed
    /// (logged as a warning).
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::info!("No profile file found at {:?}", path);
            return Ok(None);
        }
        let _lock = PathLock::shared(path)?;
        Ok(read_profile(path))
    }

    /// Replace the stored profile with this one
    pub fn save(&self, path: &Path) -> Result<()> {
        let _lock = PathLock::exclusive(path)?;
        write_profile(self, path)
    }

    /// Load the profile, transform it, and save the result
    ///
    /// Fails with `NotFound` if no profile exists yet.
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&Profile) -> Result<Profile>,
    {
        Self::upsert(path, |current| match current {
            Some(profile) => f(&profile),
            None => Err(missing_profile()),
        })
    }

    /// Like [`Profile::update`], but a missing profile is left alone and
    /// yields `Ok(None)`
    pub fn update_if_present<F>(path: &Path, f: F) -> Result<Option<Self>>
    where
        F: FnOnce(&Profile) -> Result<Profile>,
    {
        locked_transform(path, |current| current.as_ref().map(f).transpose())
    }

    /// Create or transform the profile; `f` receives `None` when there is none yet
    pub fn upsert<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(Option<Profile>) -> Result<Profile>,
    {
        locked_transform(path, |current| f(current).map(Some))?.ok_or_else(missing_profile)
    }
}

fn missing_profile() -> Error {
    Error::NotFound("no profile yet; create one with `kcal profile set`".into())
}

/// Run `f` on the current profile under the exclusive lock; `Some` is written back
fn locked_transform<F>(path: &Path, f: F) -> Result<Option<Profile>>
where
    F: FnOnce(Option<Profile>) -> Result<Option<Profile>>,
{
    let _lock = PathLock::exclusive(path)?;
    let current = if path.exists() {
        read_profile(path)
    } else {
        None
    };

    let next = f(current)?;
    if let Some(ref profile) = next {
        write_profile(profile, path)?;
    }
    Ok(next)
}

/// Caller holds the lock
fn read_profile(path: &Path) -> Option<Profile> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!("Failed to read profile file {:?}: {}", path, e);
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(profile) => {
            tracing::debug!("Loaded profile from {:?}", path);
            Some(profile)
        }
        Err(e) => {
            tracing::warn!("Ignoring unreadable profile {:?}: {}", path, e);
            None
        }
    }
}

/// Write through a temp file in the same directory, then rename; caller holds the lock
fn write_profile(profile: &Profile, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::State(format!("profile path {:?} has no parent", path)))?;

    let mut temp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut temp, profile)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved profile to {:?}", path);
    Ok(())
}
