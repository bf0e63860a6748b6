//! Core domain types for the calorie tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Biometric inputs (gender, activity level) and the user profile
//! - Mood tracking
//! - Meal entries, meal slots and nutrition facts

use crate::config::DefaultsConfig;
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Biometric Types
// ============================================================================

/// Gender used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(Error::invalid(format!(
                "unrecognized gender '{}' (expected male or female)",
                other
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Physical activity level, each with a fixed TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise (1.2)
    Sedentary,
    /// Exercise 1-3 times a week (1.375)
    Light,
    /// Exercise 3-5 times a week (1.55)
    Moderate,
    /// Exercise 6-7 times a week (1.725)
    High,
    /// Hard daily training or a physical job (1.9)
    VeryHigh,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::High,
        ActivityLevel::VeryHigh,
    ];

    /// Multiplier applied to BMR
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
            ActivityLevel::VeryHigh => 1.9,
        }
    }

    /// Map a raw multiplier back to its level.
    ///
    /// Only the five recognized factors are accepted.
    pub fn from_factor(factor: f64) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| (level.factor() - factor).abs() < 1e-9)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "unrecognized activity factor {} (expected one of 1.2, 1.375, 1.55, 1.725, 1.9)",
                    factor
                ))
            })
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    /// Accepts either a level name or one of the recognized factors
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "high" => Ok(ActivityLevel::High),
            "very_high" | "very-high" => Ok(ActivityLevel::VeryHigh),
            other => {
                let factor: f64 = other.parse().map_err(|_| {
                    Error::invalid(format!("unrecognized activity level '{}'", other))
                })?;
                Self::from_factor(factor)
            }
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
            ActivityLevel::VeryHigh => "very_high",
        };
        write!(f, "{} ({})", name, self.factor())
    }
}

/// The five biometric inputs from which the daily target is derived
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Biometrics {
    pub gender: Gender,
    pub age_years: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity: ActivityLevel,
}

impl Biometrics {
    /// Check the positivity preconditions of the target calculation
    pub fn validate(&self) -> Result<()> {
        if self.age_years == 0 {
            return Err(Error::invalid("age must be positive"));
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(Error::invalid(format!(
                "weight must be positive, got {}",
                self.weight_kg
            )));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(Error::invalid(format!(
                "height must be positive, got {}",
                self.height_cm
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Mood
// ============================================================================

/// Self-reported mood; a profile keeps it for the day it was set on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Excellent,
    Good,
    Okay,
    Bad,
    Terrible,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Excellent,
        Mood::Good,
        Mood::Okay,
        Mood::Bad,
        Mood::Terrible,
    ];
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "excellent" => Ok(Mood::Excellent),
            "good" => Ok(Mood::Good),
            "okay" | "ok" => Ok(Mood::Okay),
            "bad" => Ok(Mood::Bad),
            "terrible" => Ok(Mood::Terrible),
            other => Err(Error::invalid(format!("unrecognized mood '{}'", other))),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::Excellent => "excellent",
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Terrible => "terrible",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Profile
// ============================================================================

/// The user's persistent profile.
///
/// Every field is read through a getter and changed only by `Profile::apply`
/// with a [`ProfileCommand`](crate::commands::ProfileCommand), so the daily
/// target always matches the biometrics and targets stay positive.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub(crate) name: Option<String>,
    pub(crate) biometrics: Option<Biometrics>,
    pub(crate) daily_target_kcal: u32,
    pub(crate) water_target_ml: u32,
    pub(crate) steps_target: u32,
    pub(crate) mood: Option<Mood>,
    #[serde(default)]
    pub(crate) mood_on: Option<NaiveDate>,
    pub(crate) water_ml: u32,
    #[serde(default)]
    pub(crate) water_on: Option<NaiveDate>,
    pub(crate) score: u64,
    pub(crate) streak_days: u32,
    #[serde(default)]
    pub(crate) last_active_on: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) last_scored_on: Option<NaiveDate>,
}

impl Profile {
    /// Create an empty profile with configured defaults
    pub fn new(name: Option<String>, defaults: &DefaultsConfig) -> Self {
        Self {
            name,
            biometrics: None,
            daily_target_kcal: defaults.daily_target_kcal,
            water_target_ml: defaults.water_target_ml,
            steps_target: defaults.steps_target,
            mood: None,
            mood_on: None,
            water_ml: 0,
            water_on: None,
            score: 0,
            streak_days: 0,
            last_active_on: None,
            last_scored_on: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn biometrics(&self) -> Option<&Biometrics> {
        self.biometrics.as_ref()
    }

    pub fn daily_target_kcal(&self) -> u32 {
        self.daily_target_kcal
    }

    pub fn water_target_ml(&self) -> u32 {
        self.water_target_ml
    }

    pub fn steps_target(&self) -> u32 {
        self.steps_target
    }

    /// Last mood set, whatever day it was set on
    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    /// Mood for `day`; a mood set on another day doesn't carry over
    pub fn mood_for(&self, day: NaiveDate) -> Option<Mood> {
        match self.mood_on {
            Some(set_on) if set_on == day => self.mood,
            Some(_) => None,
            None => self.mood,
        }
    }

    pub fn water_ml(&self) -> u32 {
        self.water_ml
    }

    /// Water intake as of `today`; a count recorded on an earlier day reads as zero
    pub fn water_ml_on(&self, today: NaiveDate) -> u32 {
        match self.water_on {
            Some(day) if day == today => self.water_ml,
            Some(_) => 0,
            None => self.water_ml,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Stored streak length, as of the last active day
    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    /// Streak still alive on `day`: 0 once a whole day has passed without activity
    pub fn streak_days_on(&self, day: NaiveDate) -> u32 {
        crate::score::effective_streak(self.last_active_on, day, self.streak_days)
    }

    pub fn last_active_on(&self) -> Option<NaiveDate> {
        self.last_active_on
    }

    pub fn last_scored_on(&self) -> Option<NaiveDate> {
        self.last_scored_on
    }

    /// Name, age, weight and height are all filled in
    pub fn is_complete(&self) -> bool {
        let has_name = self
            .name
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        has_name && self.biometrics.as_ref().is_some_and(|b| b.validate().is_ok())
    }
}

// ============================================================================
// Meals
// ============================================================================

/// Energy and macronutrients for a quantity of food
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
}

impl NutritionFacts {
    /// Multiply every value by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            fat_g: self.fat_g * factor,
            carbs_g: self.carbs_g * factor,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let fields = [
            ("calories", self.calories),
            ("protein", self.protein_g),
            ("fat", self.fat_g),
            ("carbs", self.carbs_g),
        ];
        for (label, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!(
                    "{} must be a non-negative number, got {}",
                    label, value
                )));
            }
        }
        Ok(())
    }
}

/// Part of the day a meal falls into, derived from its time
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealSlot {
    pub fn from_time(time: NaiveTime) -> Self {
        match time.hour() {
            h if h < 10 => MealSlot::Breakfast,
            h if h < 14 => MealSlot::Lunch,
            h if h < 18 => MealSlot::Snack,
            _ => MealSlot::Dinner,
        }
    }
}

impl FromStr for MealSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "snack" => Ok(MealSlot::Snack),
            "dinner" => Ok(MealSlot::Dinner),
            other => Err(Error::invalid(format!(
                "unrecognized meal type '{}' (expected breakfast, lunch, snack or dinner)",
                other
            ))),
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Snack => "snack",
            MealSlot::Dinner => "dinner",
        };
        f.pad(name)
    }
}

/// A single logged meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealEntry {
    pub id: Uuid,
    pub food_name: String,
    pub weight_grams: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl MealEntry {
    /// Build a validated meal entry with a fresh id
    pub fn new(
        food_name: impl Into<String>,
        weight_grams: f64,
        facts: NutritionFacts,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Self> {
        let food_name = food_name.into();
        if food_name.trim().is_empty() {
            return Err(Error::invalid("food name must not be empty"));
        }
        if !(weight_grams.is_finite() && weight_grams > 0.0) {
            return Err(Error::invalid(format!(
                "weight must be positive, got {}",
                weight_grams
            )));
        }
        facts.validate()?;

        Ok(Self {
            id: Uuid::new_v4(),
            food_name,
            weight_grams,
            calories: facts.calories,
            protein_g: facts.protein_g,
            fat_g: facts.fat_g,
            carbs_g: facts.carbs_g,
            date,
            time,
        })
    }

    pub fn facts(&self) -> NutritionFacts {
        NutritionFacts {
            calories: self.calories,
            protein_g: self.protein_g,
            fat_g: self.fat_g,
            carbs_g: self.carbs_g,
        }
    }

    pub fn slot(&self) -> MealSlot {
        MealSlot::from_time(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!(matches!(
            "other".parse::<Gender>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_activity_from_factor() {
        assert_eq!(
            ActivityLevel::from_factor(1.375).unwrap(),
            ActivityLevel::Light
        );
        assert!(ActivityLevel::from_factor(1.5).is_err());
        assert_eq!(
            "1.9".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::VeryHigh
        );
        assert_eq!(
            "moderate".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::Moderate
        );
        assert!("lazy".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_mood_parsing() {
        for mood in Mood::ALL {
            assert_eq!(mood.to_string().parse::<Mood>().unwrap(), mood);
        }
        assert!("meh".parse::<Mood>().is_err());
    }

    #[test]
    fn test_meal_slot_boundaries() {
        assert_eq!(MealSlot::from_time(time(9, 59)), MealSlot::Breakfast);
        assert_eq!(MealSlot::from_time(time(10, 0)), MealSlot::Lunch);
        assert_eq!(MealSlot::from_time(time(13, 30)), MealSlot::Lunch);
        assert_eq!(MealSlot::from_time(time(14, 0)), MealSlot::Snack);
        assert_eq!(MealSlot::from_time(time(18, 0)), MealSlot::Dinner);
        assert_eq!("Lunch".parse::<MealSlot>().unwrap(), MealSlot::Lunch);
        assert!("brunch".parse::<MealSlot>().is_err());
    }

    #[test]
    fn test_meal_entry_rejects_bad_input() {
        let facts = NutritionFacts {
            calories: 100.0,
            ..Default::default()
        };
        assert!(MealEntry::new("", 100.0, facts, date(2024, 1, 1), time(8, 0)).is_err());
        assert!(MealEntry::new("Oats", 0.0, facts, date(2024, 1, 1), time(8, 0)).is_err());

        let negative = NutritionFacts {
            calories: -1.0,
            ..Default::default()
        };
        assert!(MealEntry::new("Oats", 50.0, negative, date(2024, 1, 1), time(8, 0)).is_err());
    }

    #[test]
    fn test_profile_completeness() {
        let profile = Profile::new(Some("Anna".into()), &DefaultsConfig::default());
        assert!(!profile.is_complete());

        let policy = crate::policy::default_policy();
        let profile = profile
            .apply(
                crate::commands::ProfileCommand::SetBiometrics(Biometrics {
                    gender: Gender::Female,
                    age_years: 25,
                    weight_kg: 60.0,
                    height_cm: 165.0,
                    activity: ActivityLevel::Light,
                }),
                policy,
            )
            .unwrap();
        assert!(profile.is_complete());
        assert_eq!(profile.daily_target_kcal(), 1850);

        let blank = profile
            .apply(crate::commands::ProfileCommand::Rename("  ".into()), policy)
            .unwrap();
        assert!(!blank.is_complete());
    }

    #[test]
    fn test_mood_only_counts_on_its_day() {
        let mut profile = Profile::new(None, &DefaultsConfig::default());
        profile.mood = Some(Mood::Good);
        profile.mood_on = Some(date(2024, 3, 1));

        assert_eq!(profile.mood_for(date(2024, 3, 1)), Some(Mood::Good));
        assert_eq!(profile.mood_for(date(2024, 3, 2)), None);
        assert_eq!(profile.mood(), Some(Mood::Good));
    }

    #[test]
    fn test_water_reads_zero_on_a_new_day() {
        let mut profile = Profile::new(None, &DefaultsConfig::default());
        profile.water_ml = 750;
        profile.water_on = Some(date(2024, 3, 1));

        assert_eq!(profile.water_ml_on(date(2024, 3, 1)), 750);
        assert_eq!(profile.water_ml_on(date(2024, 3, 2)), 0);
    }
}
