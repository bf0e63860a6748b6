//! Meal presets: named groups of food items logged in one go.
//!
//! Built-in quick presets ship with the crate; user presets live in
//! `presets.json` in the data directory.

use crate::lock::PathLock;
use crate::{Error, MealEntry, MealSlot, NutritionFacts, Result};
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One food in a preset, with its own weight and energy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PresetItem {
    pub food_name: String,
    pub weight_grams: f64,
    pub calories: f64,
}

impl PresetItem {
    pub fn new(food_name: impl Into<String>, weight_grams: f64, calories: f64) -> Self {
        Self {
            food_name: food_name.into(),
            weight_grams,
            calories,
        }
    }

    /// Parse `name:grams:kcal`; the name may itself contain colons
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.rsplitn(3, ':');
        let (kcal, grams, name) = match (parts.next(), parts.next(), parts.next()) {
            (Some(kcal), Some(grams), Some(name)) => (kcal, grams, name),
            _ => {
                return Err(Error::invalid(format!(
                    "preset item '{}' must look like name:grams:kcal",
                    text
                )))
            }
        };
        let number = |label: &str, raw: &str| -> Result<f64> {
            raw.trim().parse::<f64>().map_err(|_| {
                Error::invalid(format!("{} in preset item '{}' is not a number", label, text))
            })
        };
        Ok(Self::new(
            name.trim(),
            number("grams", grams)?,
            number("kcal", kcal)?,
        ))
    }

    fn validate(&self) -> Result<()> {
        if self.food_name.trim().is_empty() {
            return Err(Error::invalid("preset item name must not be empty"));
        }
        if !(self.weight_grams.is_finite() && self.weight_grams > 0.0) {
            return Err(Error::invalid(format!(
                "weight of '{}' must be positive, got {}",
                self.food_name, self.weight_grams
            )));
        }
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err(Error::invalid(format!(
                "calories of '{}' must be a non-negative number, got {}",
                self.food_name, self.calories
            )));
        }
        Ok(())
    }
}

/// A named set of foods eaten together
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealPreset {
    pub name: String,
    pub meal_type: MealSlot,
    pub items: Vec<PresetItem>,
}

impl MealPreset {
    pub fn new(name: impl Into<String>, meal_type: MealSlot, items: Vec<PresetItem>) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::invalid("preset name must not be empty"));
        }
        if items.is_empty() {
            return Err(Error::invalid(format!(
                "preset '{}' needs at least one item",
                name
            )));
        }
        for item in &items {
            item.validate()?;
        }
        Ok(Self {
            name,
            meal_type,
            items,
        })
    }

    pub fn total_calories(&self) -> f64 {
        self.items.iter().map(|item| item.calories).sum()
    }

    /// One meal entry per item, all stamped with the same date and time
    pub fn to_meals(&self, date: NaiveDate, time: NaiveTime) -> Result<Vec<MealEntry>> {
        self.items
            .iter()
            .map(|item| {
                let facts = NutritionFacts {
                    calories: item.calories,
                    ..NutritionFacts::default()
                };
                MealEntry::new(item.food_name.clone(), item.weight_grams, facts, date, time)
            })
            .collect()
    }

    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

static BUILTIN_PRESETS: Lazy<Vec<MealPreset>> = Lazy::new(build_builtin_presets);

/// Quick presets available without any setup
pub fn builtin_presets() -> &'static [MealPreset] {
    &BUILTIN_PRESETS
}

fn build_builtin_presets() -> Vec<MealPreset> {
    let preset = |name: &str, meal_type, items: &[(&str, f64, f64)]| MealPreset {
        name: name.into(),
        meal_type,
        items: items
            .iter()
            .map(|&(food, grams, kcal)| PresetItem::new(food, grams, kcal))
            .collect(),
    };

    vec![
        preset(
            "Classic breakfast",
            MealSlot::Breakfast,
            &[
                ("Oatmeal", 200.0, 140.0),
                ("Banana", 120.0, 107.0),
                ("Coffee with milk", 200.0, 60.0),
            ],
        ),
        preset(
            "Light lunch",
            MealSlot::Lunch,
            &[
                ("Chicken breast", 150.0, 248.0),
                ("Green salad", 150.0, 30.0),
                ("Whole grain bread", 40.0, 106.0),
            ],
        ),
        preset(
            "Afternoon snack",
            MealSlot::Snack,
            &[("Greek yogurt", 150.0, 146.0), ("Almonds", 30.0, 174.0)],
        ),
        preset(
            "Simple dinner",
            MealSlot::Dinner,
            &[
                ("Salmon", 150.0, 312.0),
                ("Rice", 180.0, 234.0),
                ("Broccoli", 100.0, 34.0),
            ],
        ),
    ]
}

/// User presets persisted as a JSON array
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All user presets; a missing file means none yet
    pub fn load_all(&self) -> Result<Vec<MealPreset>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let _lock = PathLock::shared(&self.path)?;
        self.read()
    }

    /// Save a new preset; names are unique ignoring case, built-ins included
    pub fn add(&self, preset: MealPreset) -> Result<()> {
        let preset = MealPreset::new(preset.name, preset.meal_type, preset.items)?;
        if builtin_presets().iter().any(|p| p.matches(&preset.name)) {
            return Err(Error::invalid(format!(
                "'{}' is a built-in preset name",
                preset.name
            )));
        }

        let _lock = PathLock::exclusive(&self.path)?;
        let mut presets = self.read()?;
        if presets.iter().any(|p| p.matches(&preset.name)) {
            return Err(Error::invalid(format!(
                "a preset named '{}' already exists",
                preset.name
            )));
        }
        tracing::debug!("Saving preset '{}' ({} items)", preset.name, preset.items.len());
        presets.push(preset);
        self.write(&presets)
    }

    /// Delete a user preset; returns whether one was removed
    pub fn remove(&self, name: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let _lock = PathLock::exclusive(&self.path)?;
        let mut presets = self.read()?;
        let before = presets.len();
        presets.retain(|p| !p.matches(name));
        if presets.len() == before {
            return Ok(false);
        }
        self.write(&presets)?;
        Ok(true)
    }

    /// Look up a preset by name, user presets first, then built-ins
    pub fn find(&self, name: &str) -> Result<MealPreset> {
        let user = self.load_all()?;
        user.iter()
            .chain(builtin_presets())
            .find(|p| p.matches(name))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no preset named '{}'", name.trim())))
    }

    fn read(&self) -> Result<Vec<MealPreset>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, presets: &[MealPreset]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, presets)?;
        temp.flush()?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}
