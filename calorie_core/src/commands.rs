//! Profile commands.
//!
//! Each change to a profile is expressed as a [`ProfileCommand`] applied to a
//! snapshot, producing a new snapshot. Computing a change is kept separate from
//! persisting it; callers decide when and where the result is stored.

use crate::policy::ScoringPolicy;
use crate::progress::{reset_water, update_water};
use crate::score::{advance_streak, compute_daily_score_delta_with};
use crate::target::target_for;
use crate::{Biometrics, Error, Mood, Profile, Result};
use chrono::NaiveDate;

/// A single change to a profile
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileCommand {
    /// Replace all biometrics and recompute the daily target
    SetBiometrics(Biometrics),
    Rename(String),
    /// Set or clear the mood for a day
    SetMood { mood: Option<Mood>, on: NaiveDate },
    /// Add (or with a negative delta, remove) water for a day
    AddWater { delta_ml: i64, on: NaiveDate },
    ResetWater { on: NaiveDate },
    SetWaterTarget(u32),
    SetStepsTarget(u32),
    /// Something was logged on this day; extends the streak
    RecordActivity { on: NaiveDate },
    /// Add the daily score delta, at most once per day
    ApplyDailyScore { on: NaiveDate },
}

impl Profile {
    /// Apply a command, returning the updated snapshot
    pub fn apply(&self, command: ProfileCommand, policy: &ScoringPolicy) -> Result<Profile> {
        let mut next = self.clone();

        match command {
            ProfileCommand::SetBiometrics(biometrics) => {
                let target = target_for(&biometrics)?;
                next.biometrics = Some(biometrics);
                next.daily_target_kcal = target;
                tracing::info!("Biometrics updated, daily target now {} kcal", target);
            }

            ProfileCommand::Rename(name) => {
                let name = name.trim().to_string();
                next.name = if name.is_empty() { None } else { Some(name) };
            }

            ProfileCommand::SetMood { mood, on } => {
                next.mood = mood;
                next.mood_on = Some(on);
                tracing::info!("Mood set to {:?} on {}", mood, on);
            }

            ProfileCommand::AddWater { delta_ml, on } => {
                let current = self.water_ml_on(on);
                next.water_ml = update_water(current, delta_ml);
                next.water_on = Some(on);
                tracing::info!(
                    "Water {} -> {} ml ({:+} ml) on {}",
                    current,
                    next.water_ml,
                    delta_ml,
                    on
                );
            }

            ProfileCommand::ResetWater { on } => {
                next.water_ml = reset_water();
                next.water_on = Some(on);
                tracing::info!("Water reset on {}", on);
            }

            ProfileCommand::SetWaterTarget(ml) => {
                if ml == 0 {
                    return Err(Error::invalid("water target must be positive"));
                }
                next.water_target_ml = ml;
            }

            ProfileCommand::SetStepsTarget(steps) => {
                if steps == 0 {
                    return Err(Error::invalid("steps target must be positive"));
                }
                next.steps_target = steps;
            }

            ProfileCommand::RecordActivity { on } => {
                next.streak_days = advance_streak(self.last_active_on, on, self.streak_days);
                if self.last_active_on.map_or(true, |last| on > last) {
                    next.last_active_on = Some(on);
                }
                tracing::debug!("Activity on {}: streak {} days", on, next.streak_days);
            }

            ProfileCommand::ApplyDailyScore { on } => {
                if self.last_scored_on == Some(on) {
                    tracing::info!("Daily score already applied for {}", on);
                    return Ok(next);
                }

                let delta = compute_daily_score_delta_with(policy, &self.as_of(on));

                next.score = self.score.saturating_add(delta);
                next.last_scored_on = Some(on);
                tracing::info!(
                    "Applied daily score for {}: +{} (total {})",
                    on,
                    delta,
                    next.score
                );
            }
        }

        Ok(next)
    }

    /// Score that [`ProfileCommand::ApplyDailyScore`] would add on `on`; 0 if already applied
    pub fn pending_daily_score(&self, on: NaiveDate, policy: &ScoringPolicy) -> u64 {
        if self.last_scored_on == Some(on) {
            return 0;
        }
        compute_daily_score_delta_with(policy, &self.as_of(on))
    }

    /// Snapshot with the per-day fields (water, mood, streak) as they stand on `on`
    fn as_of(&self, on: NaiveDate) -> Profile {
        let mut view = self.clone();
        view.water_ml = self.water_ml_on(on);
        view.mood = self.mood_for(on);
        view.streak_days = self.streak_days_on(on);
        view
    }
}
