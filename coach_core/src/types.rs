//! Core domain types for the coaching system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise definitions and muscle groups
//! - User profiles and goals
//! - Programs, days and prescriptions
//! - Weekly review inputs and adjustment events

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Floor for per-exercise set counts; mutations never go below this.
pub const MIN_SETS: u32 = 2;

// ============================================================================
// Exercise Types
// ============================================================================

/// Primary muscle group targeted by an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Delts,
    Triceps,
    Lats,
    MidBack,
    Biceps,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Core,
}

/// Movement class of an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MovementClass {
    Compound,
    Isolation,
    Accessory,
}

/// An exercise definition (e.g., "Barbell Bench Press")
///
/// Definitions are immutable once the catalog is built. The name doubles as
/// the unique key; prescriptions reference it rather than owning the record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub name: String,
    pub muscle: MuscleGroup,
    pub class: MovementClass,
    /// Equipment tags; empty means the exercise needs nothing (bodyweight).
    #[serde(default)]
    pub equipment: Vec<String>,
    /// Injury tags that rule this exercise out.
    #[serde(default)]
    pub injury_exclude: Vec<String>,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex, as used by the Mifflin-St Jeor formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Sex::Male),
            "f" | "female" => Ok(Sex::Female),
            other => Err(Error::Config(format!("unknown sex: {}", other))),
        }
    }
}

/// Training/nutrition goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Cut,
    Bulk,
    Recomp,
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cut" | "fatloss" | "lose" | "loss" => Ok(Goal::Cut),
            "bulk" | "gain" | "mass" => Ok(Goal::Bulk),
            "recomp" | "maintain" => Ok(Goal::Recomp),
            other => Err(Error::Config(format!("unknown goal: {}", other))),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Cut => write!(f, "cut"),
            Goal::Bulk => write!(f, "bulk"),
            Goal::Recomp => write!(f, "recomp"),
        }
    }
}

/// Training experience tier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for Experience {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "novice" => Ok(Experience::Beginner),
            "intermediate" => Ok(Experience::Intermediate),
            "advanced" => Ok(Experience::Advanced),
            other => Err(Error::Config(format!("unknown experience tier: {}", other))),
        }
    }
}

/// A user's onboarding profile; transient input, never stored by the core
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub sex: Sex,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: Goal,
    pub days_per_week: u8,
    pub session_minutes: u32,
    pub experience: Experience,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub injuries: Vec<String>,
}

// ============================================================================
// Program Types
// ============================================================================

/// Inclusive rep range for a prescription
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepRange {
    pub low: u32,
    pub high: u32,
}

impl fmt::Display for RepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Target reps-in-reserve range for a prescription
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RirRange {
    pub low: u8,
    pub high: u8,
}

impl fmt::Display for RirRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// One prescribed exercise within a day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExercisePrescription {
    /// Name of the exercise; references the catalog, does not own the record.
    pub exercise: String,
    pub sets: u32,
    pub reps: RepRange,
    pub rir: RirRange,
    pub progression: String,
}

impl ExercisePrescription {
    /// Shift the set count by `delta`, clamped so sets never drop below
    /// [`MIN_SETS`]. Returns true if the count actually changed.
    pub fn adjust_sets(&mut self, delta: i32) -> bool {
        let new_sets = (self.sets as i64 + delta as i64).max(MIN_SETS as i64) as u32;
        if new_sets == self.sets {
            return false;
        }
        self.sets = new_sets;
        true
    }
}

/// One training day; exercise order is significant, index 0 is the key lift
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Day {
    pub label: String,
    pub exercises: Vec<ExercisePrescription>,
}

impl Day {
    /// The day's key lift, eligible for weekly set mutation
    pub fn key_lift(&self) -> Option<&ExercisePrescription> {
        self.exercises.first()
    }
}

/// Nutrition metadata carried on a stored program, rewritten at each review
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct NutritionMeta {
    #[serde(default)]
    pub current_calories: Option<i64>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

/// A stored weekly program for a single user
///
/// A user may accumulate many programs over time; exactly one (max
/// `created_at`) is the latest and is what the review cycle loads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Program {
    pub user_id: u64,
    pub split: crate::split::SplitId,
    pub days: Vec<Day>,
    #[serde(default)]
    pub nutrition: NutritionMeta,
    pub created_at: DateTime<Utc>,
}

impl Program {
    /// An empty-day program, substituted when a stored blob cannot be parsed
    pub fn empty(user_id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            split: crate::split::SplitId::Ppl,
            days: Vec::new(),
            nutrition: NutritionMeta::default(),
            created_at,
        }
    }
}

// ============================================================================
// Nutrition Types
// ============================================================================

/// Daily calorie and macro targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionTarget {
    pub calories: u32,
    pub protein_g: u32,
    pub fat_g: u32,
    pub carb_g: u32,
    pub tdee: u32,
}

/// A fixed meal template record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealTemplate {
    pub name: String,
    pub items: Vec<String>,
}

// ============================================================================
// Weekly Review Types
// ============================================================================

/// Inputs to one weekly review cycle; transient
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyReviewInput {
    pub user_id: u64,
    /// Planned training completed, 0-100
    pub train_completion_pct: f64,
    pub avg_rpe: f64,
    /// 0-10 scale
    pub avg_soreness: f64,
    /// Average over the review period
    pub sleep_hours: f64,
    /// Bodyweight in kg at the start of the week
    pub weight_start: f64,
    /// Bodyweight in kg at the end of the week
    pub weight_end: f64,
    pub goal: Goal,
    pub steps_avg: u32,
    /// Current daily calorie target from the last plan
    pub calories: i64,
}

/// Structured diff recorded with every applied adjustment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentDiff {
    pub training_changed_exercises: Vec<String>,
    pub training_action: String,
    pub nutrition_kcal_delta: i64,
    pub nutrition_steps_delta: i64,
    /// Week-over-week weight change, percent, rounded to 3 decimals
    pub weight_week_change_pct: f64,
    pub inputs: WeeklyReviewInput,
    pub note: String,
}

/// Append-only audit record of one weekly adjustment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentEvent {
    pub id: Uuid,
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub reason: String,
    pub payload: AdjustmentDiff,
}

/// Training/nutrition action summary returned to the caller
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentSummary {
    pub training: String,
    pub nutrition: String,
}

/// Result of a completed weekly review
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReviewOutcome {
    pub coach_note: String,
    pub adjustment: AdjustmentSummary,
    pub saved: bool,
    pub created_at: DateTime<Utc>,
}
