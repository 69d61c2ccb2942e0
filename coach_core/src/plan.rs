//! Plan generation: the composed generate operation.
//!
//! Ties the program builder and the nutrition calculator together into the
//! single response shape handed to callers, and derives the storable
//! [`Program`] record from it.

use crate::builder::{build_program, ProgressionModel};
use crate::catalog::Catalog;
use crate::nutrition::{compute_targets, meal_templates, ActivityStrategy};
use crate::split::SplitId;
use crate::types::{Day, MealTemplate, NutritionMeta, Program, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a generate request returns
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanResponse {
    pub split: SplitId,
    pub days: Vec<Day>,
    pub key_lifts: Vec<String>,
    pub progression_model: ProgressionModel,
    pub why_split: String,
    pub why_substitution: String,
    pub calories: u32,
    pub protein_g: u32,
    pub fat_g: u32,
    pub carb_g: u32,
    pub tdee: u32,
    pub meals: Vec<MealTemplate>,
}

impl PlanResponse {
    /// The storable program record for this plan
    pub fn to_program(&self, user_id: u64, created_at: DateTime<Utc>) -> Program {
        Program {
            user_id,
            split: self.split,
            days: self.days.clone(),
            nutrition: NutritionMeta {
                current_calories: Some(self.calories as i64),
                recommendation: None,
                last_reviewed_at: None,
            },
            created_at,
        }
    }
}

/// Build a full plan (training program + nutrition targets + meals) from a
/// profile. Pure given the catalog and strategy.
pub fn generate_plan(
    catalog: &Catalog,
    profile: &UserProfile,
    strategy: ActivityStrategy,
) -> PlanResponse {
    let built = build_program(
        catalog,
        profile.days_per_week,
        &profile.equipment,
        &profile.injuries,
    );
    let target = compute_targets(profile, strategy);

    PlanResponse {
        split: built.split,
        days: built.days,
        key_lifts: built.key_lifts,
        progression_model: built.progression_model,
        why_split: built.why_split,
        why_substitution: built.why_substitution,
        calories: target.calories,
        protein_g: target.protein_g,
        fat_g: target.fat_g,
        carb_g: target.carb_g,
        tdee: target.tdee,
        meals: meal_templates(),
    }
}
