//! Meal log persistence.
//!
//! Meals are appended to a JSONL (JSON Lines) file. Appends, reads and
//! deletes all hold the log's sidecar lock; deletion rewrites the file and
//! renames it into place.

use crate::lock::PathLock;
use crate::{Error, MealEntry, Result};
use chrono::NaiveDate;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Meal sink trait for persisting meals
pub trait MealSink {
    fn append(&mut self, meal: &MealEntry) -> Result<()>;
}

/// JSONL-backed meal log with file locking
pub struct JsonlMealLog {
    path: PathBuf,
}

impl JsonlMealLog {
    /// Create a meal log for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every meal in the log
    pub fn read_all(&self) -> Result<Vec<MealEntry>> {
        read_meals(&self.path)
    }

    /// Meals dated within `[from, to]`, ordered by date and time
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<MealEntry>> {
        if from > to {
            return Err(Error::invalid(format!(
                "date range start {} is after end {}",
                from, to
            )));
        }

        let mut meals: Vec<MealEntry> = self
            .read_all()?
            .into_iter()
            .filter(|m| m.date >= from && m.date <= to)
            .collect();
        meals.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));

        tracing::debug!("Loaded {} meals between {} and {}", meals.len(), from, to);
        Ok(meals)
    }

    /// Meals logged on a single day
    pub fn on(&self, day: NaiveDate) -> Result<Vec<MealEntry>> {
        self.between(day, day)
    }

    /// Delete a meal by id.
    ///
    /// Returns `false` if no meal had that id. The remaining entries are
    /// written to a temp file and renamed over the log while the log lock
    /// is held.
    pub fn remove(&mut self, id: Uuid) -> Result<bool> {
        let _lock = PathLock::exclusive(&self.path)?;
        if !self.path.exists() {
            return Ok(false);
        }

        let mut kept = Vec::new();
        let mut found = false;
        for line in BufReader::new(File::open(&self.path)?).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<MealEntry>(&line) {
                Ok(meal) if meal.id == id => found = true,
                // Lines that fail to parse are carried over untouched
                _ => kept.push(line),
            }
        }

        if !found {
            return Ok(false);
        }

        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Other(format!("meal log path {:?} has no parent", self.path)))?;
        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            for line in &kept {
                writeln!(writer, "{}", line)?;
            }
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Removed meal {} from log", id);
        Ok(true)
    }
}

impl MealSink for JsonlMealLog {
    fn append(&mut self, meal: &MealEntry) -> Result<()> {
        let _lock = PathLock::exclusive(&self.path)?;

        // Opened only after locking, so a concurrent remove has finished its rename
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut line = serde_json::to_string(meal)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;

        tracing::debug!("Appended meal {} to log", meal.id);
        Ok(())
    }
}

/// Read all meals from a JSONL log file
///
/// Lines that don't parse are skipped with a warning.
pub fn read_meals(path: &Path) -> Result<Vec<MealEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let _lock = PathLock::shared(path)?;
    let reader = BufReader::new(File::open(path)?);

    let meals: Vec<MealEntry> = reader
        .lines()
        .enumerate()
        .filter_map(|(line_num, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => match serde_json::from_str::<MealEntry>(&line) {
                Ok(meal) => Some(Ok(meal)),
                Err(e) => {
                    tracing::warn!("Failed to parse meal at line {}: {}", line_num + 1, e);
                    None
                }
            },
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<_>>()?;

    tracing::debug!("Read {} meals from log", meals.len());
    Ok(meals)
}
