//! Exercise catalog and candidate filtering.
//!
//! The catalog is an ordered, immutable pool of exercise definitions loaded
//! once at startup. Order matters: the program builder always takes the
//! first qualifying candidate, so two identical filter calls produce an
//! identical ordered result.

use crate::types::{ExerciseDefinition, MovementClass, MuscleGroup};
use crate::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The complete ordered pool of exercise definitions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    pub exercises: Vec<ExerciseDefinition>,
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

fn ex(
    name: &str,
    muscle: MuscleGroup,
    class: MovementClass,
    equipment: &[&str],
    injury_exclude: &[&str],
) -> ExerciseDefinition {
    ExerciseDefinition {
        name: name.into(),
        muscle,
        class,
        equipment: equipment.iter().map(|s| s.to_string()).collect(),
        injury_exclude: injury_exclude.iter().map(|s| s.to_string()).collect(),
    }
}

/// Builds the default catalog of built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns
/// a cached reference. This function is retained for testing and custom
/// catalog creation.
pub fn build_default_catalog() -> Catalog {
    use MovementClass::*;
    use MuscleGroup::*;

    let exercises = vec![
        // Chest
        ex("Barbell Bench Press", Chest, Compound, &["barbell"], &["shoulder"]),
        ex("Dumbbell Bench Press", Chest, Compound, &["dumbbell"], &["shoulder"]),
        ex("Machine Chest Press", Chest, Compound, &["machine"], &[]),
        ex("Push-Up", Chest, Compound, &[], &["wrist"]),
        ex("Cable Fly", Chest, Isolation, &["cable"], &["shoulder"]),
        // Delts
        ex("Overhead Press", Delts, Compound, &["barbell"], &["shoulder"]),
        ex("Dumbbell Shoulder Press", Delts, Compound, &["dumbbell"], &["shoulder"]),
        ex("Lateral Raise", Delts, Isolation, &["dumbbell"], &[]),
        // Triceps
        ex("Close-Grip Bench Press", Triceps, Compound, &["barbell"], &["shoulder", "elbow"]),
        ex("Triceps Pushdown", Triceps, Isolation, &["cable"], &["elbow"]),
        ex("Overhead Triceps Extension", Triceps, Isolation, &["dumbbell"], &["elbow"]),
        // Lats
        ex("Pull-Up", Lats, Compound, &["pullup_bar"], &["shoulder"]),
        ex("Lat Pulldown", Lats, Compound, &["cable", "machine"], &[]),
        ex("Straight-Arm Pulldown", Lats, Isolation, &["cable"], &[]),
        // Mid back
        ex("Barbell Row", MidBack, Compound, &["barbell"], &["lower_back"]),
        ex("Seated Cable Row", MidBack, Compound, &["cable", "machine"], &[]),
        ex("Chest-Supported Row", MidBack, Compound, &["dumbbell"], &[]),
        ex("Face Pull", MidBack, Isolation, &["cable"], &[]),
        // Biceps (no compound entry; selection falls back to isolations)
        ex("Barbell Curl", Biceps, Isolation, &["barbell"], &["wrist"]),
        ex("Dumbbell Curl", Biceps, Isolation, &["dumbbell"], &[]),
        ex("Cable Curl", Biceps, Isolation, &["cable"], &[]),
        // Quads
        ex("Barbell Back Squat", Quads, Compound, &["barbell"], &["knee", "lower_back"]),
        ex("Leg Press", Quads, Compound, &["machine"], &["knee"]),
        ex("Goblet Squat", Quads, Compound, &["dumbbell", "kettlebell"], &["knee"]),
        ex("Bodyweight Squat", Quads, Compound, &[], &[]),
        ex("Leg Extension", Quads, Isolation, &["machine"], &["knee"]),
        // Hamstrings
        ex("Romanian Deadlift", Hamstrings, Compound, &["barbell"], &["lower_back"]),
        ex("Dumbbell Romanian Deadlift", Hamstrings, Compound, &["dumbbell"], &["lower_back"]),
        ex("Lying Leg Curl", Hamstrings, Isolation, &["machine"], &["knee"]),
        // Glutes
        ex("Barbell Hip Thrust", Glutes, Compound, &["barbell"], &[]),
        ex("Glute Bridge", Glutes, Compound, &[], &[]),
        // Calves
        ex("Machine Calf Raise", Calves, Isolation, &["machine"], &[]),
        ex("Standing Calf Raise", Calves, Isolation, &[], &[]),
        // Core
        ex("Plank", Core, Accessory, &[], &[]),
        ex("Hanging Knee Raise", Core, Accessory, &["pullup_bar"], &["shoulder"]),
        ex("Cable Crunch", Core, Isolation, &["cable"], &[]),
    ];

    Catalog { exercises }
}

impl Catalog {
    /// Load a catalog from a JSON document of the form
    /// `{ "exercises": [...] }`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file on disk
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        tracing::info!(
            "Loaded catalog with {} exercises from {:?}",
            catalog.exercises.len(),
            path
        );
        Ok(catalog)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for exercise in &self.exercises {
            if exercise.name.is_empty() {
                errors.push("Exercise has empty name".to_string());
            }
            if !seen.insert(exercise.name.as_str()) {
                errors.push(format!("Duplicate exercise name '{}'", exercise.name));
            }
        }

        // Every muscle group a day template can ask for needs candidates
        const ALL_MUSCLES: [MuscleGroup; 11] = [
            MuscleGroup::Chest,
            MuscleGroup::Delts,
            MuscleGroup::Triceps,
            MuscleGroup::Lats,
            MuscleGroup::MidBack,
            MuscleGroup::Biceps,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::Calves,
            MuscleGroup::Core,
        ];
        for muscle in ALL_MUSCLES {
            if !self.exercises.iter().any(|e| e.muscle == muscle) {
                errors.push(format!("Catalog has no exercises for {:?}", muscle));
            }
        }

        errors
    }
}

fn normalize(tags: &[String]) -> Vec<String> {
    tags.iter().map(|t| t.trim().to_lowercase()).collect()
}

/// Filter the catalog down to candidates matching the caller's constraints
///
/// Stable: the result preserves catalog order and is fully determined by the
/// inputs. An exercise qualifies when:
/// - the muscle filter is absent or matches its primary muscle,
/// - it needs no equipment, OR the caller declared none (bodyweight
///   fallback), OR the two equipment sets intersect,
/// - none of its injury-exclusion tags appear in the caller's injuries.
pub fn filter<'a>(
    catalog: &'a Catalog,
    equipment: &[String],
    injuries: &[String],
    muscle: Option<MuscleGroup>,
) -> Vec<&'a ExerciseDefinition> {
    let equipment = normalize(equipment);
    let injuries = normalize(injuries);

    catalog
        .exercises
        .iter()
        .filter(|ex| {
            if let Some(m) = muscle {
                if ex.muscle != m {
                    return false;
                }
            }
            if !ex.equipment.is_empty()
                && !equipment.is_empty()
                && !ex.equipment.iter().any(|e| equipment.contains(e))
            {
                return false;
            }
            if ex.injury_exclude.iter().any(|tag| injuries.contains(tag)) {
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_filter_preserves_catalog_order() {
        let catalog = build_default_catalog();
        let all = filter(&catalog, &[], &[], None);
        let names: Vec<_> = all.iter().map(|e| e.name.as_str()).collect();
        let expected: Vec<_> = catalog.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_empty_equipment_allows_everything() {
        let catalog = build_default_catalog();
        let all = filter(&catalog, &[], &[], None);
        assert_eq!(all.len(), catalog.exercises.len());
    }

    #[test]
    fn test_equipment_intersection() {
        let catalog = build_default_catalog();
        let result = filter(&catalog, &strings(&["barbell"]), &[], None);
        assert!(result.iter().any(|e| e.name == "Barbell Bench Press"));
        // Cable-only exercises are out, bodyweight ones stay in
        assert!(!result.iter().any(|e| e.name == "Cable Fly"));
        assert!(result.iter().any(|e| e.name == "Push-Up"));
    }

    #[test]
    fn test_injury_exclusion() {
        let catalog = build_default_catalog();
        let result = filter(&catalog, &[], &strings(&["shoulder"]), None);
        assert!(!result.iter().any(|e| e.name == "Barbell Bench Press"));
        assert!(!result.iter().any(|e| e.name == "Overhead Press"));
        assert!(result.iter().any(|e| e.name == "Machine Chest Press"));
    }

    #[test]
    fn test_muscle_filter() {
        let catalog = build_default_catalog();
        let result = filter(&catalog, &[], &[], Some(MuscleGroup::Biceps));
        assert!(!result.is_empty());
        assert!(result.iter().all(|e| e.muscle == MuscleGroup::Biceps));
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let catalog = build_default_catalog();
        let result = filter(&catalog, &strings(&[" Barbell "]), &strings(&["SHOULDER"]), None);
        assert!(result.iter().any(|e| e.name == "Barbell Row"));
        assert!(!result.iter().any(|e| e.name == "Barbell Bench Press"));
    }

    #[test]
    fn test_filter_is_deterministic() {
        let catalog = build_default_catalog();
        let equipment = strings(&["dumbbell", "cable"]);
        let injuries = strings(&["knee"]);
        let a = filter(&catalog, &equipment, &injuries, Some(MuscleGroup::Quads));
        let b = filter(&catalog, &equipment, &injuries, Some(MuscleGroup::Quads));
        let names_a: Vec<_> = a.iter().map(|e| &e.name).collect();
        let names_b: Vec<_> = b.iter().map(|e| &e.name).collect();
        assert_eq!(names_a, names_b);
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let json = r#"{
            "exercises": [
                {
                    "name": "Barbell Bench Press",
                    "muscle": "chest",
                    "class": "compound",
                    "equipment": ["barbell"],
                    "injury_exclude": ["shoulder"]
                },
                {
                    "name": "Plank",
                    "muscle": "core",
                    "class": "accessory"
                }
            ]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.exercises.len(), 2);
        assert_eq!(catalog.exercises[0].muscle, MuscleGroup::Chest);
        assert!(catalog.exercises[1].equipment.is_empty());
    }
}
