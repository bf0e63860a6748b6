//! Seven-day calorie summary.

use crate::MealEntry;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Number of days covered by the weekly summary, ending today
pub const WEEK_DAYS: i64 = 7;

/// Totals for one day of the week
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub kcal: f64,
    /// Only known for today; earlier days report 0
    pub water_ml: u32,
}

/// Calorie totals for the seven days ending today, oldest first
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct WeeklySummary {
    pub days: Vec<DaySummary>,
    pub total_kcal: f64,
    /// `total_kcal / 7`, rounded, regardless of how many days have meals
    pub avg_daily_kcal: i64,
}

/// First day of the week window ending at `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WEEK_DAYS - 1)
}

/// Bucket meals into the seven days ending at `today`.
///
/// Meals outside the window are ignored.
pub fn weekly_summary(meals: &[MealEntry], today: NaiveDate, water_today_ml: u32) -> WeeklySummary {
    let start = week_start(today);
    let mut days: Vec<DaySummary> = (0..WEEK_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            DaySummary {
                date,
                kcal: 0.0,
                water_ml: if date == today { water_today_ml } else { 0 },
            }
        })
        .collect();

    for meal in meals {
        if meal.date < start || meal.date > today {
            continue;
        }
        let index = (meal.date - start).num_days() as usize;
        if let Some(day) = days.get_mut(index) {
            day.kcal += meal.calories;
        }
    }

    let total_kcal: f64 = days.iter().map(|d| d.kcal).sum();
    let avg_daily_kcal = (total_kcal / WEEK_DAYS as f64).round() as i64;

    tracing::debug!(
        "Weekly summary {} to {}: {:.1} kcal total, {} avg",
        start,
        today,
        total_kcal,
        avg_daily_kcal
    );

    WeeklySummary {
        days,
        total_kcal,
        avg_daily_kcal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NutritionFacts;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn meal_on(day: NaiveDate, calories: f64) -> MealEntry {
        MealEntry::new(
            "soup",
            250.0,
            NutritionFacts {
                calories,
                ..Default::default()
            },
            day,
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_seven_days_oldest_first() {
        let today = date(2024, 3, 3);
        let summary = weekly_summary(&[], today, 0);

        assert_eq!(summary.days.len(), 7);
        assert_eq!(summary.days[0].date, date(2024, 2, 26));
        assert_eq!(summary.days[6].date, today);
        assert_eq!(summary.total_kcal, 0.0);
        assert_eq!(summary.avg_daily_kcal, 0);
    }

    #[test]
    fn test_buckets_and_average() {
        let today = date(2024, 3, 10);
        let meals = vec![
            meal_on(today, 500.0),
            meal_on(today, 300.0),
            meal_on(date(2024, 3, 4), 1000.0),
            meal_on(date(2024, 3, 3), 9999.0), // outside window
            meal_on(date(2024, 3, 11), 9999.0), // future
        ];

        let summary = weekly_summary(&meals, today, 1250);

        assert_eq!(summary.days[6].kcal, 800.0);
        assert_eq!(summary.days[0].kcal, 1000.0);
        assert_eq!(summary.total_kcal, 1800.0);
        // 1800 / 7 = 257.14
        assert_eq!(summary.avg_daily_kcal, 257);
    }

    #[test]
    fn test_water_only_today() {
        let today = date(2024, 3, 10);
        let summary = weekly_summary(&[], today, 1500);

        assert_eq!(summary.days[6].water_ml, 1500);
        assert!(summary.days[..6].iter().all(|d| d.water_ml == 0));
    }
}
