//! Program builder: composes the split selector and exercise filter into a
//! full weekly program.
//!
//! Selection is deterministic by construction: for each muscle in a day's
//! template the builder takes the first qualifying candidate in catalog
//! order, preferring compounds, then isolations, then anything. Unsatisfiable
//! constraints degrade to shorter days rather than failing.

use crate::catalog::{filter, Catalog};
use crate::split::{select_split, DayLabel, SplitId};
use crate::types::{
    Day, ExerciseDefinition, ExercisePrescription, MovementClass, RepRange, RirRange,
};
use serde::{Deserialize, Serialize};

/// Minimum prescriptions per day before the builder stops topping up
pub const MIN_DAY_EXERCISES: usize = 5;

/// Fixed double-progression scheme attached to every prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressionModel {
    pub sets: u32,
    pub reps: RepRange,
    pub rir: RirRange,
    pub note: String,
}

impl Default for ProgressionModel {
    fn default() -> Self {
        Self {
            sets: 3,
            reps: RepRange { low: 6, high: 10 },
            rir: RirRange { low: 1, high: 2 },
            note: "Double progression: 3x6-10 at RIR 1-2; when all sets reach 10 reps, \
                   add 2.5-5 kg next session."
                .into(),
        }
    }
}

/// A freshly built weekly program plus its rationale strings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BuiltProgram {
    pub split: SplitId,
    pub days: Vec<Day>,
    /// Index-0 exercise of each day, deduplicated in schedule order
    pub key_lifts: Vec<String>,
    pub progression_model: ProgressionModel,
    pub why_split: String,
    pub why_substitution: String,
}

const SUBSTITUTION_RATIONALE: &str = "Exercises are filtered by your available equipment and \
     known injuries to keep the stimulus high while reducing risk.";

/// Build a weekly program for the given constraints
///
/// Pure: two calls with identical arguments yield identical programs.
pub fn build_program(
    catalog: &Catalog,
    days_per_week: u8,
    equipment: &[String],
    injuries: &[String],
) -> BuiltProgram {
    let (split, labels) = select_split(days_per_week);
    tracing::info!(
        "Building {} program for {} day(s)/week",
        split,
        days_per_week
    );

    let progression = ProgressionModel::default();
    let days: Vec<Day> = labels
        .iter()
        .map(|label| build_day(catalog, *label, equipment, injuries, &progression))
        .collect();

    let mut key_lifts: Vec<String> = Vec::new();
    for day in &days {
        if let Some(key) = day.key_lift() {
            if !key_lifts.contains(&key.exercise) {
                key_lifts.push(key.exercise.clone());
            }
        }
    }

    BuiltProgram {
        split,
        days,
        key_lifts,
        progression_model: progression.clone(),
        why_split: split.rationale().to_string(),
        why_substitution: SUBSTITUTION_RATIONALE.to_string(),
    }
}

fn build_day(
    catalog: &Catalog,
    label: DayLabel,
    equipment: &[String],
    injuries: &[String],
    progression: &ProgressionModel,
) -> Day {
    let mut exercises = Vec::new();

    for muscle in label.muscle_template() {
        let candidates = filter(catalog, equipment, injuries, Some(*muscle));
        match pick(&candidates) {
            Some(exercise) => exercises.push(prescribe(exercise, progression)),
            None => {
                // Unsatisfiable muscle: the day just comes out shorter
                tracing::debug!("{}: no candidates for {:?}, skipping", label, muscle);
            }
        }
    }

    if exercises.len() < MIN_DAY_EXERCISES {
        let pool = filter(catalog, equipment, injuries, None);
        for exercise in pool {
            if exercises.len() >= MIN_DAY_EXERCISES {
                break;
            }
            if exercises.iter().any(|p| p.exercise == exercise.name) {
                continue;
            }
            exercises.push(prescribe(exercise, progression));
        }
    }

    Day {
        label: label.to_string(),
        exercises,
    }
}

/// First compound, else first isolation, else first candidate of any class
fn pick<'a>(candidates: &[&'a ExerciseDefinition]) -> Option<&'a ExerciseDefinition> {
    candidates
        .iter()
        .find(|e| e.class == MovementClass::Compound)
        .or_else(|| candidates.iter().find(|e| e.class == MovementClass::Isolation))
        .or_else(|| candidates.first())
        .copied()
}

fn prescribe(exercise: &ExerciseDefinition, progression: &ProgressionModel) -> ExercisePrescription {
    ExercisePrescription {
        exercise: exercise.name.clone(),
        sets: progression.sets,
        reps: progression.reps,
        rir: progression.rir,
        progression: progression.note.clone(),
    }
}
