//! Daily calorie target calculation.
//!
//! Basal metabolic rate comes from the Mifflin-St Jeor equation and is scaled
//! by the activity factor:
//! - male:   `10 * weight + 6.25 * height - 5 * age + 5`
//! - female: `10 * weight + 6.25 * height - 5 * age - 161`

use crate::{ActivityLevel, Biometrics, Error, Gender, Result};

const WEIGHT_COEFFICIENT: f64 = 10.0;
const HEIGHT_COEFFICIENT: f64 = 6.25;
const AGE_COEFFICIENT: f64 = 5.0;
const MALE_OFFSET: f64 = 5.0;
const FEMALE_OFFSET: f64 = -161.0;

/// Basal metabolic rate in kcal/day
pub fn basal_metabolic_rate(gender: Gender, age_years: u32, weight_kg: f64, height_cm: f64) -> f64 {
    let offset = match gender {
        Gender::Male => MALE_OFFSET,
        Gender::Female => FEMALE_OFFSET,
    };
    WEIGHT_COEFFICIENT * weight_kg + HEIGHT_COEFFICIENT * height_cm
        - AGE_COEFFICIENT * f64::from(age_years)
        + offset
}

/// Compute the daily calorie target from raw inputs.
///
/// `activity_factor` must be one of the five recognized multipliers
/// (1.2, 1.375, 1.55, 1.725, 1.9).
pub fn compute_daily_target(
    gender: Gender,
    age_years: u32,
    weight_kg: f64,
    height_cm: f64,
    activity_factor: f64,
) -> Result<u32> {
    let activity = ActivityLevel::from_factor(activity_factor)?;
    target_for(&Biometrics {
        gender,
        age_years,
        weight_kg,
        height_cm,
        activity,
    })
}

/// Compute the daily calorie target for a validated set of biometrics
pub fn target_for(biometrics: &Biometrics) -> Result<u32> {
    biometrics.validate()?;

    let bmr = basal_metabolic_rate(
        biometrics.gender,
        biometrics.age_years,
        biometrics.weight_kg,
        biometrics.height_cm,
    );
    let target = (bmr * biometrics.activity.factor()).round();

    // Extreme inputs (e.g. very old and very light) drive the equation negative
    if target <= 0.0 || target > f64::from(u32::MAX) {
        return Err(Error::invalid(format!(
            "biometrics produce an unusable target of {} kcal",
            target
        )));
    }

    tracing::debug!(
        "Daily target for {} (bmr {:.2}, activity {}): {} kcal",
        biometrics.gender,
        bmr,
        biometrics.activity,
        target
    );

    Ok(target as u32)
}
