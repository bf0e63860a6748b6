//! Tunable scoring and progress constants.
//!
//! Every weight, threshold and lookup table used by the progress and score
//! computations lives in [`ScoringPolicy`], so thresholds can be tuned from the
//! `[scoring]` config section or varied in tests without touching the
//! arithmetic.

use crate::score::LevelTier;
use crate::Mood;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Cached default policy - built once and shared
static DEFAULT_POLICY: Lazy<ScoringPolicy> = Lazy::new(ScoringPolicy::default);

/// Get a reference to the shared default policy
pub fn default_policy() -> &'static ScoringPolicy {
    &DEFAULT_POLICY
}

/// Points per mood used by the daily score
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MoodScorePoints {
    pub excellent: u32,
    pub good: u32,
    pub okay: u32,
    pub bad: u32,
    pub terrible: u32,
}

impl Default for MoodScorePoints {
    fn default() -> Self {
        Self {
            excellent: 20,
            good: 15,
            okay: 10,
            bad: 5,
            terrible: 2,
        }
    }
}

impl MoodScorePoints {
    pub fn points(&self, mood: Mood) -> u32 {
        match mood {
            Mood::Excellent => self.excellent,
            Mood::Good => self.good,
            Mood::Okay => self.okay,
            Mood::Bad => self.bad,
            Mood::Terrible => self.terrible,
        }
    }
}

/// Mood share of the activity index.
///
/// Only the two best moods are distinguished; everything else, including no
/// mood at all, gets `other`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MoodActivityPoints {
    pub excellent: f64,
    pub good: f64,
    pub other: f64,
}

impl Default for MoodActivityPoints {
    fn default() -> Self {
        Self {
            excellent: 20.0,
            good: 15.0,
            other: 10.0,
        }
    }
}

impl MoodActivityPoints {
    pub fn points(&self, mood: Option<Mood>) -> f64 {
        match mood {
            Some(Mood::Excellent) => self.excellent,
            Some(Mood::Good) => self.good,
            _ => self.other,
        }
    }
}

/// Minimum cumulative score for a level
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TierThreshold {
    pub tier: LevelTier,
    pub min_score: u64,
}

/// All scoring and progress constants
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoringPolicy {
    /// Maximum activity-index points from calorie progress
    #[serde(default = "default_calorie_weight")]
    pub calorie_weight: f64,

    /// Maximum activity-index points from water progress
    #[serde(default = "default_water_weight")]
    pub water_weight: f64,

    #[serde(default)]
    pub mood_activity_points: MoodActivityPoints,

    /// Remaining budget at or below this share of the target counts as "near target"
    #[serde(default = "default_near_target_fraction")]
    pub near_target_fraction: f64,

    #[serde(default = "default_profile_complete_points")]
    pub profile_complete_points: u32,

    #[serde(default)]
    pub mood_score_points: MoodScorePoints,

    #[serde(default = "default_water_ml_per_point")]
    pub water_ml_per_point: u32,

    #[serde(default = "default_streak_day_points")]
    pub streak_day_points: u32,

    /// Highest first
    #[serde(default = "default_level_tiers")]
    pub level_tiers: Vec<TierThreshold>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            calorie_weight: default_calorie_weight(),
            water_weight: default_water_weight(),
            mood_activity_points: MoodActivityPoints::default(),
            near_target_fraction: default_near_target_fraction(),
            profile_complete_points: default_profile_complete_points(),
            mood_score_points: MoodScorePoints::default(),
            water_ml_per_point: default_water_ml_per_point(),
            streak_day_points: default_streak_day_points(),
            level_tiers: default_level_tiers(),
        }
    }
}

fn default_calorie_weight() -> f64 {
    50.0
}

fn default_water_weight() -> f64 {
    30.0
}

fn default_near_target_fraction() -> f64 {
    0.2
}

fn default_profile_complete_points() -> u32 {
    10
}

fn default_water_ml_per_point() -> u32 {
    250
}

fn default_streak_day_points() -> u32 {
    5
}

fn default_level_tiers() -> Vec<TierThreshold> {
    vec![
        TierThreshold {
            tier: LevelTier::Master,
            min_score: 1000,
        },
        TierThreshold {
            tier: LevelTier::Expert,
            min_score: 500,
        },
        TierThreshold {
            tier: LevelTier::Active,
            min_score: 200,
        },
        TierThreshold {
            tier: LevelTier::Novice,
            min_score: 0,
        },
    ]
}

impl ScoringPolicy {
    /// Validate the policy, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let weights = [
            ("calorie_weight", self.calorie_weight),
            ("water_weight", self.water_weight),
            ("mood_activity_points.excellent", self.mood_activity_points.excellent),
            ("mood_activity_points.good", self.mood_activity_points.good),
            ("mood_activity_points.other", self.mood_activity_points.other),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{} must be a non-negative number, got {}", name, value));
            }
        }

        if !(0.0..=1.0).contains(&self.near_target_fraction) {
            errors.push(format!(
                "near_target_fraction must be within [0, 1], got {}",
                self.near_target_fraction
            ));
        }

        if self.water_ml_per_point == 0 {
            errors.push("water_ml_per_point must be positive".to_string());
        }

        if self.level_tiers.is_empty() {
            errors.push("level_tiers must not be empty".to_string());
        }
        for pair in self.level_tiers.windows(2) {
            if pair[0].min_score <= pair[1].min_score {
                errors.push(format!(
                    "level_tiers must be strictly descending: {:?} ({}) before {:?} ({})",
                    pair[0].tier, pair[0].min_score, pair[1].tier, pair[1].min_score
                ));
            }
        }
        if let Some(lowest) = self.level_tiers.last() {
            if lowest.min_score != 0 {
                errors.push(format!(
                    "lowest level tier must start at 0, got {}",
                    lowest.min_score
                ));
            }
        }

        errors
    }
}
