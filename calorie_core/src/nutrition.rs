//! Nutrition lookup.
//!
//! Calorie and macronutrient values come from an external source. The
//! [`NutritionLookup`] trait is the seam; [`FoodTable`] is a local
//! implementation backed by a JSON file of per-100 g values.

use crate::{Error, NutritionFacts, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Queries shorter than this return no suggestions
const MIN_SEARCH_LEN: usize = 3;

/// Source of nutrition values for a named food
pub trait NutritionLookup {
    /// Nutrition for `weight_grams` of `food_name`, or `None` when the food is unknown
    fn lookup(&self, food_name: &str, weight_grams: f64) -> Result<Option<NutritionFacts>>;
}

/// Food table file format: one row per food, values per 100 g
#[derive(Debug, Deserialize)]
struct FoodRow {
    name: String,
    kcal_per_100g: f64,
    #[serde(default)]
    protein_per_100g: f64,
    #[serde(default)]
    fat_per_100g: f64,
    #[serde(default)]
    carbs_per_100g: f64,
}

/// In-memory food table keyed by lowercase name
#[derive(Clone, Debug, Default)]
pub struct FoodTable {
    foods: HashMap<String, (String, NutritionFacts)>,
}

impl FoodTable {
    /// Load a food table from a JSON file
    ///
    /// Returns an empty table if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No food table found at {:?}", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let rows: Vec<FoodRow> = serde_json::from_str(&contents)?;

        let mut table = Self::default();
        for row in rows {
            let per_100g = NutritionFacts {
                calories: row.kcal_per_100g,
                protein_g: row.protein_per_100g,
                fat_g: row.fat_per_100g,
                carbs_g: row.carbs_per_100g,
            };
            if let Err(e) = per_100g.validate() {
                tracing::warn!("Skipping food '{}': {}", row.name, e);
                continue;
            }
            table.insert(&row.name, per_100g);
        }

        tracing::info!("Loaded {} foods from {:?}", table.len(), path);
        Ok(table)
    }

    /// Add or replace a food, values per 100 g
    pub fn insert(&mut self, name: &str, per_100g: NutritionFacts) {
        let key = name.trim().to_lowercase();
        self.foods.insert(key, (name.trim().to_string(), per_100g));
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Names containing `query`, case-insensitive and sorted.
    ///
    /// Queries of fewer than three characters return nothing.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Vec::new();
        }

        let mut names: Vec<&str> = self
            .foods
            .iter()
            .filter(|(key, _)| key.contains(&query))
            .map(|(_, (name, _))| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl NutritionLookup for FoodTable {
    fn lookup(&self, food_name: &str, weight_grams: f64) -> Result<Option<NutritionFacts>> {
        if !(weight_grams.is_finite() && weight_grams > 0.0) {
            return Err(Error::invalid(format!(
                "weight must be positive, got {}",
                weight_grams
            )));
        }

        let key = food_name.trim().to_lowercase();
        Ok(self
            .foods
            .get(&key)
            .map(|(_, per_100g)| per_100g.scaled(weight_grams / 100.0)))
    }
}
