//! Daily progress aggregation.
//!
//! Combines a day's logged meals, water intake and targets into a normalized
//! progress view:
//! - Calorie progress with a budget status
//! - Hydration progress
//! - The composite activity index
//! - Water delta application and reset

use crate::policy::{default_policy, ScoringPolicy};
use crate::{Error, MealEntry, Mood, Result};
use serde::Serialize;
use std::fmt;

/// Where the day's intake stands against the budget
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    Exceeded,
    NearTarget,
    WithinBudget,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressStatus::Exceeded => "exceeded",
            ProgressStatus::NearTarget => "near-target",
            ProgressStatus::WithinBudget => "within-budget",
        };
        f.write_str(label)
    }
}

/// Calorie progress for one day
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DailyProgress {
    pub consumed_kcal: f64,
    /// Negative once the target is exceeded
    pub remaining_kcal: f64,
    /// Consumed share of the target, clamped to [0, 100]
    pub percent: f64,
    pub status: ProgressStatus,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub meal_count: usize,
}

/// Hydration progress for one day
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WaterProgress {
    pub current_ml: i64,
    pub target_ml: i64,
    /// Clamped to [0, 100]
    pub percent: f64,
}

fn require_positive(name: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(Error::invalid(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn clamped_percent(value: f64, target: f64) -> f64 {
    (value * 100.0 / target).clamp(0.0, 100.0)
}

/// Compute calorie progress using the default policy
pub fn compute_daily_progress(meals: &[MealEntry], target: i64) -> Result<DailyProgress> {
    compute_daily_progress_with(default_policy(), meals, target)
}

/// Compute calorie progress for a day's meals against `target` kcal.
///
/// Status is decided in order: nothing remaining is `Exceeded`, a remainder
/// within the policy's near-target share is `NearTarget`, anything else is
/// `WithinBudget`.
pub fn compute_daily_progress_with(
    policy: &ScoringPolicy,
    meals: &[MealEntry],
    target: i64,
) -> Result<DailyProgress> {
    require_positive("calorie target", target)?;
    let target = target as f64;

    let mut progress = DailyProgress {
        consumed_kcal: 0.0,
        remaining_kcal: 0.0,
        percent: 0.0,
        status: ProgressStatus::WithinBudget,
        protein_g: 0.0,
        fat_g: 0.0,
        carbs_g: 0.0,
        meal_count: meals.len(),
    };

    for meal in meals {
        meal.facts().validate()?;
        progress.consumed_kcal += meal.calories;
        progress.protein_g += meal.protein_g;
        progress.fat_g += meal.fat_g;
        progress.carbs_g += meal.carbs_g;
    }

    progress.remaining_kcal = target - progress.consumed_kcal;
    progress.percent = clamped_percent(progress.consumed_kcal, target);
    progress.status = if progress.remaining_kcal <= 0.0 {
        ProgressStatus::Exceeded
    } else if progress.remaining_kcal <= target * policy.near_target_fraction {
        ProgressStatus::NearTarget
    } else {
        ProgressStatus::WithinBudget
    };

    tracing::debug!(
        "Daily progress: {:.1}/{} kcal over {} meals ({})",
        progress.consumed_kcal,
        target,
        progress.meal_count,
        progress.status
    );

    Ok(progress)
}

/// Compute hydration progress
pub fn compute_water_progress(current_ml: i64, target_ml: i64) -> Result<WaterProgress> {
    require_positive("water target", target_ml)?;
    Ok(WaterProgress {
        current_ml,
        target_ml,
        percent: clamped_percent(current_ml as f64, target_ml as f64),
    })
}

/// Compute the activity index using the default policy
pub fn compute_activity_index(
    consumed_kcal: f64,
    target: i64,
    current_water_ml: i64,
    water_target: i64,
    mood: Option<Mood>,
) -> Result<f64> {
    compute_activity_index_with(
        default_policy(),
        consumed_kcal,
        target,
        current_water_ml,
        water_target,
        mood,
    )
}

/// Heuristic daily engagement score in [0, 100].
///
/// This is not a physiological measure. With the default policy it is built
/// from up to 50 points of calorie progress, up to 30 points of water
/// progress and 10-20 points for mood.
pub fn compute_activity_index_with(
    policy: &ScoringPolicy,
    consumed_kcal: f64,
    target: i64,
    current_water_ml: i64,
    water_target: i64,
    mood: Option<Mood>,
) -> Result<f64> {
    require_positive("calorie target", target)?;
    require_positive("water target", water_target)?;
    require_non_negative("consumed kcal", consumed_kcal)?;

    let calorie_ratio = (consumed_kcal / target as f64).clamp(0.0, 1.0);
    let water_ratio = (current_water_ml as f64 / water_target as f64).clamp(0.0, 1.0);

    let index = calorie_ratio * policy.calorie_weight
        + water_ratio * policy.water_weight
        + policy.mood_activity_points.points(mood);

    Ok(index.clamp(0.0, 100.0))
}

/// Apply a water delta; the result never drops below zero.
///
/// Negative deltas larger than the current amount are clamped, not rejected.
pub fn update_water(current: u32, delta: i64) -> u32 {
    let next = i64::from(current).saturating_add(delta);
    next.clamp(0, i64::from(u32::MAX)) as u32
}

/// Explicit reset of the day's water intake
pub fn reset_water() -> u32 {
    0
}

/// Both the calorie and the water target have been reached
pub fn goals_met(consumed_kcal: f64, target: i64, water_ml: i64, water_target: i64) -> bool {
    consumed_kcal >= target as f64 && water_ml >= water_target
}
