#![forbid(unsafe_code)]

//! Core domain model and computations for the kcal calorie tracker.
//!
//! This crate provides:
//! - Domain types (profile, biometrics, mood, meals)
//! - Daily target calculation (Mifflin-St Jeor)
//! - Progress aggregation and weekly summaries
//! - Gamified scoring, levels and streaks
//! - Persistence (profile store, meal log, CSV export)
//! - Nutrition lookup and meal presets

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod policy;
pub mod target;
pub mod progress;
pub mod summary;
pub mod score;
pub mod commands;
pub mod store;
pub mod meal_log;
pub mod export;
pub mod nutrition;
pub mod preset;
mod lock;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use policy::{default_policy, ScoringPolicy};
pub use target::compute_daily_target;
pub use progress::{
    compute_activity_index, compute_daily_progress, compute_water_progress, goals_met,
    reset_water, update_water, DailyProgress, ProgressStatus, WaterProgress,
};
pub use summary::{weekly_summary, WeeklySummary};
pub use score::{
    classify_level, compute_daily_score_delta, streak_message, Level, LevelTier,
};
pub use commands::ProfileCommand;
pub use meal_log::{JsonlMealLog, MealSink};
pub use export::export_meals_csv;
pub use nutrition::{FoodTable, NutritionLookup};
pub use preset::{builtin_presets, MealPreset, PresetItem, PresetStore};
