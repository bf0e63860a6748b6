//! Gamification: daily points, levels and streaks.
//!
//! The daily delta is additive and meant to be added to the cumulative score,
//! never to replace it. Each rule contributes independently:
//! - Complete profile (name, age, weight, height)
//! - Mood of the day
//! - One point per `water_ml_per_point` ml of water
//! - A fixed number of points per streak day

use crate::policy::{default_policy, ScoringPolicy};
use crate::Profile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Level a cumulative score falls into
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LevelTier {
    Novice,
    Active,
    Expert,
    Master,
}

impl LevelTier {
    pub fn label(self) -> &'static str {
        match self {
            LevelTier::Novice => "Novice",
            LevelTier::Active => "Active",
            LevelTier::Expert => "Expert",
            LevelTier::Master => "Master",
        }
    }
}

/// Result of classifying a cumulative score
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct Level {
    pub label: &'static str,
    pub tier: LevelTier,
}

impl From<LevelTier> for Level {
    fn from(tier: LevelTier) -> Self {
        Self {
            label: tier.label(),
            tier,
        }
    }
}

/// Compute the daily score delta using the default policy
pub fn compute_daily_score_delta(profile: &Profile) -> u64 {
    compute_daily_score_delta_with(default_policy(), profile)
}

/// Points earned for the profile's current snapshot
pub fn compute_daily_score_delta_with(policy: &ScoringPolicy, profile: &Profile) -> u64 {
    let mut delta = 0u64;

    if profile.is_complete() {
        delta += u64::from(policy.profile_complete_points);
    }

    if let Some(mood) = profile.mood {
        delta += u64::from(policy.mood_score_points.points(mood));
    }

    if policy.water_ml_per_point > 0 {
        delta += u64::from(profile.water_ml / policy.water_ml_per_point);
    }

    delta += u64::from(profile.streak_days) * u64::from(policy.streak_day_points);

    tracing::debug!(
        "Daily score delta: {} (complete: {}, mood: {:?}, water: {} ml, streak: {})",
        delta,
        profile.is_complete(),
        profile.mood,
        profile.water_ml,
        profile.streak_days
    );

    delta
}

/// Classify a cumulative score using the default tiers
pub fn classify_level(cumulative_score: u64) -> Level {
    classify_level_with(default_policy(), cumulative_score)
}

/// Highest tier whose threshold the score reaches; thresholds are inclusive
pub fn classify_level_with(policy: &ScoringPolicy, cumulative_score: u64) -> Level {
    policy
        .level_tiers
        .iter()
        .find(|threshold| cumulative_score >= threshold.min_score)
        .map(|threshold| Level::from(threshold.tier))
        .unwrap_or_else(|| Level::from(LevelTier::Novice))
}

/// Encouragement text for a streak length
pub fn streak_message(streak_days: u32) -> String {
    match streak_days {
        0 => "start tracking".to_string(),
        1 => "great start".to_string(),
        2..=6 => format!("{} days in a row", streak_days),
        7..=29 => format!("{} days, well done", streak_days),
        _ => format!("{} days, incredible", streak_days),
    }
}

/// Streak length after recording activity on `today`.
///
/// Activity on the day after the last active day extends the streak, a second
/// entry on the same day leaves it unchanged and a gap starts over at 1.
pub fn advance_streak(last_active_on: Option<NaiveDate>, today: NaiveDate, streak_days: u32) -> u32 {
    match last_active_on {
        Some(last) if last == today => streak_days.max(1),
        // Backdated entries never rewrite history
        Some(last) if last > today => streak_days,
        Some(last) if last.succ_opt() == Some(today) => streak_days.saturating_add(1),
        _ => 1,
    }
}

/// Streak length that still counts on `day`.
///
/// Activity on `day` or the day before keeps the streak alive; after a full
/// day without activity it is 0, whatever length was last recorded.
pub fn effective_streak(last_active_on: Option<NaiveDate>, day: NaiveDate, streak_days: u32) -> u32 {
    match last_active_on {
        Some(last) if last >= day => streak_days,
        Some(last) if last.succ_opt() == Some(day) => streak_days,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ProfileCommand;
    use crate::config::DefaultsConfig;
    use crate::policy::TierThreshold;
    use crate::{ActivityLevel, Biometrics, Gender, Mood};

    fn complete_profile() -> Profile {
        Profile::new(Some("A".into()), &DefaultsConfig::default())
            .apply(
                ProfileCommand::SetBiometrics(Biometrics {
                    gender: Gender::Male,
                    age_years: 30,
                    weight_kg: 70.0,
                    height_cm: 175.0,
                    activity: ActivityLevel::Moderate,
                }),
                default_policy(),
            )
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_delta_all_rules() {
        let mut profile = complete_profile();
        profile.mood = Some(Mood::Good);
        profile.water_ml = 1000;
        profile.streak_days = 3;

        // 10 + 15 + 4 + 15
        assert_eq!(compute_daily_score_delta(&profile), 44);
    }

    #[test]
    fn test_daily_delta_empty_profile() {
        let profile = Profile::new(None, &DefaultsConfig::default());
        assert_eq!(compute_daily_score_delta(&profile), 0);
    }

    #[test]
    fn test_water_points_floor_and_uncapped() {
        let mut profile = Profile::new(None, &DefaultsConfig::default());
        profile.water_ml = 249;
        assert_eq!(compute_daily_score_delta(&profile), 0);

        profile.water_ml = 10_000;
        assert_eq!(compute_daily_score_delta(&profile), 40);
    }

    #[test]
    fn test_mood_points() {
        let mut profile = Profile::new(None, &DefaultsConfig::default());
        profile.mood = Some(Mood::Terrible);
        assert_eq!(compute_daily_score_delta(&profile), 2);
        profile.mood = Some(Mood::Excellent);
        assert_eq!(compute_daily_score_delta(&profile), 20);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ScoringPolicy {
            water_ml_per_point: 500,
            streak_day_points: 1,
            ..ScoringPolicy::default()
        };
        let mut profile = Profile::new(None, &DefaultsConfig::default());
        profile.water_ml = 1000;
        profile.streak_days = 4;
        assert_eq!(compute_daily_score_delta_with(&policy, &profile), 6);
    }

    #[test]
    fn test_classify_level_boundaries() {
        assert_eq!(classify_level(0).tier, LevelTier::Novice);
        assert_eq!(classify_level(199).label, "Novice");
        assert_eq!(classify_level(200).label, "Active");
        assert_eq!(classify_level(499).label, "Active");
        assert_eq!(classify_level(500).label, "Expert");
        assert_eq!(classify_level(999).label, "Expert");
        assert_eq!(classify_level(1000).label, "Master");
        assert_eq!(classify_level(u64::MAX).tier, LevelTier::Master);
    }

    #[test]
    fn test_classify_level_custom_tiers() {
        let policy = ScoringPolicy {
            level_tiers: vec![
                TierThreshold {
                    tier: LevelTier::Expert,
                    min_score: 50,
                },
                TierThreshold {
                    tier: LevelTier::Novice,
                    min_score: 0,
                },
            ],
            ..ScoringPolicy::default()
        };
        assert_eq!(classify_level_with(&policy, 60).tier, LevelTier::Expert);
        assert_eq!(classify_level_with(&policy, 49).tier, LevelTier::Novice);
    }

    #[test]
    fn test_streak_messages() {
        assert_eq!(streak_message(0), "start tracking");
        assert_eq!(streak_message(1), "great start");
        assert_eq!(streak_message(2), "2 days in a row");
        assert_eq!(streak_message(6), "6 days in a row");
        assert_eq!(streak_message(7), "7 days, well done");
        assert_eq!(streak_message(29), "29 days, well done");
        assert_eq!(streak_message(30), "30 days, incredible");
    }

    #[test]
    fn test_advance_streak() {
        let today = date(2024, 6, 10);

        assert_eq!(advance_streak(None, today, 0), 1);
        assert_eq!(advance_streak(Some(date(2024, 6, 9)), today, 4), 5);
        assert_eq!(advance_streak(Some(today), today, 4), 4);
        assert_eq!(advance_streak(Some(date(2024, 6, 7)), today, 4), 1);
        assert_eq!(advance_streak(Some(date(2024, 6, 11)), today, 4), 4);
    }

    #[test]
    fn test_effective_streak_lapses_after_a_missed_day() {
        let day = date(2024, 4, 25);

        assert_eq!(effective_streak(Some(day), day, 10), 10);
        assert_eq!(effective_streak(Some(date(2024, 4, 24)), day, 10), 10);
        assert_eq!(effective_streak(Some(date(2024, 4, 23)), day, 10), 0);
        assert_eq!(effective_streak(Some(date(2024, 4, 10)), day, 10), 0);
        assert_eq!(effective_streak(None, day, 3), 0);
    }
}
