//! Nutrition calculator: calorie and macro targets plus fixed meal templates.
//!
//! BMR uses the Mifflin-St Jeor equation. Two activity-multiplier strategies
//! exist side by side; which one is served is a config decision
//! (`training_days` is the default).

use crate::types::{Goal, MealTemplate, NutritionTarget, Sex, UserProfile};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the activity multiplier is derived from the profile
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStrategy {
    /// Coarse step table keyed by weekly training-day count
    #[default]
    TrainingDays,
    /// Finer step table keyed by total weekly training minutes
    WeeklyMinutes,
}

impl FromStr for ActivityStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "training_days" | "days" => Ok(ActivityStrategy::TrainingDays),
            "weekly_minutes" | "minutes" => Ok(ActivityStrategy::WeeklyMinutes),
            other => Err(Error::Config(format!(
                "unknown activity strategy: {}",
                other
            ))),
        }
    }
}

/// Basal metabolic rate via Mifflin-St Jeor
pub fn bmr(sex: Sex, age: u32, height_cm: f64, weight_kg: f64) -> f64 {
    let sex_term = match sex {
        Sex::Male => 5.0,
        Sex::Female => -161.0,
    };
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + sex_term
}

fn day_count_multiplier(days_per_week: u8) -> f64 {
    match days_per_week {
        2 => 1.3,
        3 => 1.4,
        4 => 1.5,
        5 => 1.6,
        6 => 1.7,
        _ => 1.5,
    }
}

fn weekly_minutes_multiplier(days_per_week: u8, session_minutes: u32) -> f64 {
    let weekly_minutes = days_per_week as u32 * session_minutes;
    match weekly_minutes {
        0..=59 => 1.2,
        60..=179 => 1.35,
        180..=299 => 1.5,
        300..=449 => 1.6,
        _ => 1.75,
    }
}

fn activity_multiplier(strategy: ActivityStrategy, days_per_week: u8, session_minutes: u32) -> f64 {
    match strategy {
        ActivityStrategy::TrainingDays => day_count_multiplier(days_per_week),
        ActivityStrategy::WeeklyMinutes => {
            weekly_minutes_multiplier(days_per_week, session_minutes)
        }
    }
}

fn goal_factor(goal: Goal) -> f64 {
    match goal {
        Goal::Cut => 0.85,
        Goal::Bulk => 1.08,
        Goal::Recomp => 1.0,
    }
}

/// Compute daily calorie and macro targets for a profile
///
/// Protein is fixed at 2.0 g/kg and fat at 0.8 g/kg; carbs take whatever
/// calories remain, floored at zero.
pub fn compute_targets(profile: &UserProfile, strategy: ActivityStrategy) -> NutritionTarget {
    let bmr = bmr(profile.sex, profile.age, profile.height_cm, profile.weight_kg);
    let multiplier = activity_multiplier(strategy, profile.days_per_week, profile.session_minutes);
    let tdee = bmr * multiplier;
    let calories = (tdee * goal_factor(profile.goal)).floor() as u32;

    let protein_g = (profile.weight_kg * 2.0).round() as u32;
    let fat_g = (profile.weight_kg * 0.8).round() as u32;
    let remainder =
        calories as f64 - (protein_g as f64 * 4.0) - (fat_g as f64 * 9.0);
    let carb_g = (remainder / 4.0).round().max(0.0) as u32;

    tracing::debug!(
        "Nutrition targets ({:?}): bmr={:.0} tdee={:.0} calories={}",
        strategy,
        bmr,
        tdee,
        calories
    );

    NutritionTarget {
        calories,
        protein_g,
        fat_g,
        carb_g,
        tdee: tdee.floor() as u32,
    }
}

/// Fixed, goal-independent meal templates (Turkish staples)
///
/// Meal content is not scaled to the macro totals; the list is returned
/// unmodified for every caller.
pub fn meal_templates() -> Vec<MealTemplate> {
    fn meal(name: &str, items: &[&str]) -> MealTemplate {
        MealTemplate {
            name: name.into(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    vec![
        meal(
            "Kahvaltı: Yulaf & Yumurta",
            &["Yulaf 80g", "Süt light 250ml", "Whey 1 ölçek (ops)", "Yumurta 3", "Muz 1"],
        ),
        meal(
            "Öğle: Tavuklu Pilav",
            &["Pirinç 120g (çiğ)", "Tavuk göğüs 180g", "Zeytinyağı 10g", "Salata"],
        ),
        meal(
            "Ara: Yoğurt & Granola",
            &["Yoğurt light 200g", "Granola 40g", "Bal 10g"],
        ),
        meal(
            "Akşam: Kırmızı Et & Patates",
            &["Dana yağsız 180g", "Patates 400g", "Zeytinyağı 10g", "Sebze"],
        ),
        meal(
            "Gece: Peynir & Kraker",
            &["Lor/az yağlı 150g", "Tam tahıllı kraker 40g"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Experience;

    fn profile() -> UserProfile {
        UserProfile {
            sex: Sex::Male,
            age: 30,
            height_cm: 180.0,
            weight_kg: 80.0,
            goal: Goal::Recomp,
            days_per_week: 4,
            session_minutes: 60,
            experience: Experience::Intermediate,
            equipment: vec![],
            injuries: vec![],
        }
    }

    #[test]
    fn test_bmr_male() {
        // 10*80 + 6.25*180 - 5*30 + 5 = 800 + 1125 - 150 + 5
        assert_eq!(bmr(Sex::Male, 30, 180.0, 80.0), 1780.0);
    }

    #[test]
    fn test_bmr_female() {
        // 10*60 + 6.25*165 - 5*28 - 161 = 600 + 1031.25 - 140 - 161
        assert_eq!(bmr(Sex::Female, 28, 165.0, 60.0), 1330.25);
    }

    #[test]
    fn test_day_count_table() {
        assert_eq!(day_count_multiplier(2), 1.3);
        assert_eq!(day_count_multiplier(6), 1.7);
        // Out-of-table day counts use the middle step
        assert_eq!(day_count_multiplier(1), 1.5);
        assert_eq!(day_count_multiplier(9), 1.5);
    }

    #[test]
    fn test_weekly_minutes_table() {
        assert_eq!(weekly_minutes_multiplier(1, 30), 1.2);
        assert_eq!(weekly_minutes_multiplier(2, 45), 1.35);
        assert_eq!(weekly_minutes_multiplier(4, 60), 1.5);
        assert_eq!(weekly_minutes_multiplier(5, 80), 1.6);
        assert_eq!(weekly_minutes_multiplier(6, 90), 1.75);
    }

    #[test]
    fn test_strategies_diverge_on_same_profile() {
        let p = profile();
        let by_days = compute_targets(&p, ActivityStrategy::TrainingDays);
        let by_minutes = compute_targets(&p, ActivityStrategy::WeeklyMinutes);
        // 4 days -> 1.5 on both tables here, so force a divergent profile
        assert_eq!(by_days.tdee, by_minutes.tdee);

        let mut p = profile();
        p.days_per_week = 2;
        p.session_minutes = 30;
        let by_days = compute_targets(&p, ActivityStrategy::TrainingDays);
        let by_minutes = compute_targets(&p, ActivityStrategy::WeeklyMinutes);
        // 2 days maps to 1.3; 60 weekly minutes maps to 1.35
        assert!(by_minutes.tdee > by_days.tdee);
    }

    #[test]
    fn test_goal_adjustment() {
        let mut p = profile();
        let maintain = compute_targets(&p, ActivityStrategy::TrainingDays);

        p.goal = Goal::Cut;
        let cut = compute_targets(&p, ActivityStrategy::TrainingDays);
        p.goal = Goal::Bulk;
        let bulk = compute_targets(&p, ActivityStrategy::TrainingDays);

        // tdee = 1780 * 1.5 = 2670
        assert_eq!(maintain.calories, 2670);
        assert_eq!(cut.calories, (2670.0_f64 * 0.85).floor() as u32);
        assert_eq!(bulk.calories, (2670.0_f64 * 1.08).floor() as u32);
        assert_eq!(maintain.tdee, 2670);
    }

    #[test]
    fn test_macro_split() {
        let target = compute_targets(&profile(), ActivityStrategy::TrainingDays);
        assert_eq!(target.protein_g, 160); // 80kg * 2.0
        assert_eq!(target.fat_g, 64); // 80kg * 0.8
        let expected_carbs =
            ((target.calories as f64 - 160.0 * 4.0 - 64.0 * 9.0) / 4.0).round() as u32;
        assert_eq!(target.carb_g, expected_carbs);
    }

    #[test]
    fn test_carbs_floor_at_zero() {
        let p = UserProfile {
            sex: Sex::Female,
            age: 80,
            height_cm: 150.0,
            weight_kg: 150.0,
            goal: Goal::Cut,
            days_per_week: 2,
            session_minutes: 20,
            experience: Experience::Beginner,
            equipment: vec![],
            injuries: vec![],
        };
        let target = compute_targets(&p, ActivityStrategy::TrainingDays);
        // Protein+fat calories exceed the target; carbs must not underflow
        assert_eq!(target.carb_g, 0);
    }

    #[test]
    fn test_meal_templates_fixed() {
        let meals = meal_templates();
        assert_eq!(meals.len(), 5);
        assert!(meals[0].name.starts_with("Kahvaltı"));
        // Goal-independent: same list every call
        assert_eq!(meals, meal_templates());
    }

    #[test]
    fn test_strategy_parses() {
        assert_eq!(
            "weekly_minutes".parse::<ActivityStrategy>().unwrap(),
            ActivityStrategy::WeeklyMinutes
        );
        assert_eq!(
            "training_days".parse::<ActivityStrategy>().unwrap(),
            ActivityStrategy::TrainingDays
        );
        assert!("random".parse::<ActivityStrategy>().is_err());
    }
}
