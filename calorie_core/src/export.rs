//! CSV export of meal history.
//!
//! The CSV is written to a temp file next to the target and renamed into
//! place, so a failed export never leaves a half-written file behind.

use crate::{Error, MealEntry, Result};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    date: String,
    time: String,
    slot: String,
    food_name: String,
    weight_grams: f64,
    calories: f64,
    protein_g: f64,
    fat_g: f64,
    carbs_g: f64,
}

impl From<&MealEntry> for CsvRow {
    fn from(meal: &MealEntry) -> Self {
        CsvRow {
            id: meal.id.to_string(),
            date: meal.date.format("%Y-%m-%d").to_string(),
            time: meal.time.format("%H:%M").to_string(),
            slot: meal.slot().to_string(),
            food_name: meal.food_name.clone(),
            weight_grams: meal.weight_grams,
            calories: meal.calories,
            protein_g: meal.protein_g,
            fat_g: meal.fat_g,
            carbs_g: meal.carbs_g,
        }
    }
}

/// Write meals to a CSV file with a header row, replacing any existing file
///
/// Returns the number of meals written.
pub fn export_meals_csv(meals: &[MealEntry], csv_path: &Path) -> Result<usize> {
    let parent = match csv_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(temp.as_file());

        for meal in meals {
            writer.serialize(CsvRow::from(meal))?;
        }

        // Header only, for an empty export
        if meals.is_empty() {
            writer.write_record([
                "id",
                "date",
                "time",
                "slot",
                "food_name",
                "weight_grams",
                "calories",
                "protein_g",
                "fat_g",
                "carbs_g",
            ])?;
        }
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} meals to {:?}", meals.len(), csv_path);
    Ok(meals.len())
}
