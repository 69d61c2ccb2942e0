//! Weekly adaptation engine.
//!
//! One review transaction walks load -> evaluate -> persist -> respond:
//!
//! 1. **Training**, strict priority order:
//!    - completion >= 85% and RPE < 8 -> +1 set on up to 2 key lifts
//!    - RPE >= 9 or soreness >= 7 -> -1 set on the same targets (floor 2)
//!    - otherwise no volume change
//! 2. **Nutrition**, by goal and weekly weight-change percent
//! 3. **Sleep** advisory below 6.5h (note only, no numeric change)
//!
//! The mutated program and its adjustment event are persisted together;
//! a review with no stored program is rejected before any evaluation.

use crate::store::ProgramStore;
use crate::types::{
    AdjustmentDiff, AdjustmentEvent, AdjustmentSummary, Goal, Program, ReviewOutcome,
    WeeklyReviewInput,
};
use crate::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Key lifts eligible for a set change in one review
const MAX_SET_TARGETS: usize = 2;

/// Reason tag stamped on every auto-generated adjustment event
pub const ADJUST_REASON: &str = "weekly_auto_adjust";

/// Run one weekly review cycle against the store
///
/// Loads the user's latest program, applies the decision tree, persists the
/// mutated program together with an adjustment event, and returns the
/// composed coach note. `now` is injected so callers own the clock.
pub fn run_weekly_review(
    store: &dyn ProgramStore,
    input: &WeeklyReviewInput,
    now: DateTime<Utc>,
) -> Result<ReviewOutcome> {
    let mut program = store
        .load_latest(input.user_id)?
        .ok_or(crate::Error::ProgramNotFound {
            user_id: input.user_id,
        })?;
    tracing::debug!("Loaded program for user {}, evaluating", input.user_id);

    let mut notes: Vec<String> = Vec::new();
    let mut training_action = "maintain".to_string();
    let mut nutrition_action = "maintain".to_string();

    // Training
    let changed = evaluate_training(&mut program, input, &mut notes, &mut training_action);

    // Nutrition
    let weight_pct = weight_change_pct(input.weight_start, input.weight_end);
    let (kcal_delta, steps_delta) =
        evaluate_nutrition(input.goal, weight_pct, &mut notes, &mut nutrition_action);

    // Sleep advisory never changes numeric targets
    if input.sleep_hours < 6.5 {
        notes.push("Sleep under 6.5h; prioritize 7-8h for recovery and performance.".into());
    }

    // Fold the nutrition outcome into the program metadata
    program.nutrition.current_calories = Some(input.calories + kcal_delta);
    program.nutrition.recommendation = Some(nutrition_action.clone());
    program.nutrition.last_reviewed_at = Some(now);

    let event = AdjustmentEvent {
        id: Uuid::new_v4(),
        user_id: input.user_id,
        created_at: now,
        reason: ADJUST_REASON.into(),
        payload: AdjustmentDiff {
            training_changed_exercises: changed,
            training_action: training_action.clone(),
            nutrition_kcal_delta: kcal_delta,
            nutrition_steps_delta: steps_delta,
            weight_week_change_pct: round3(weight_pct),
            inputs: input.clone(),
            note: notes.join(" ; "),
        },
    };

    store.commit_review(&program, &event)?;
    tracing::info!(
        "Persisted weekly adjustment for user {}: training={:?} nutrition={:?}",
        input.user_id,
        training_action,
        nutrition_action
    );

    Ok(ReviewOutcome {
        coach_note: notes.join(" "),
        adjustment: AdjustmentSummary {
            training: training_action,
            nutrition: nutrition_action,
        },
        saved: true,
        created_at: now,
    })
}

fn evaluate_training(
    program: &mut Program,
    input: &WeeklyReviewInput,
    notes: &mut Vec<String>,
    action: &mut String,
) -> Vec<String> {
    if input.train_completion_pct >= 85.0 && input.avg_rpe < 8.0 {
        let changed = adjust_key_lift_sets(program, 1);
        if changed.is_empty() {
            notes.push("Training looks good; no eligible lifts to increase.".into());
        } else {
            *action = format!("+1 set on {}", changed.join(", "));
            notes.push("High adherence and manageable effort; adding 1 set to key lifts.".into());
        }
        changed
    } else if input.avg_rpe >= 9.0 || input.avg_soreness >= 7.0 {
        let changed = adjust_key_lift_sets(program, -1);
        if changed.is_empty() {
            notes.push("Fatigue high but no eligible lifts to reduce further.".into());
        } else {
            *action = format!("-1 set on {}", changed.join(", "));
            notes.push("Fatigue high; reducing 1 set on key lifts for recovery.".into());
        }
        changed
    } else {
        notes.push("Training balance looks solid; no volume change.".into());
        Vec::new()
    }
}

/// Shift the key lift (index 0) of up to [`MAX_SET_TARGETS`] leading days
///
/// A prescription already at the set floor does not count as changed, and
/// empty days are skipped; the caller sees exactly which exercises moved.
fn adjust_key_lift_sets(program: &mut Program, delta: i32) -> Vec<String> {
    let mut changed = Vec::new();
    for day in program.days.iter_mut() {
        if changed.len() >= MAX_SET_TARGETS {
            break;
        }
        let Some(key) = day.exercises.first_mut() else {
            continue;
        };
        if key.adjust_sets(delta) {
            changed.push(key.exercise.clone());
        }
    }
    changed
}

fn evaluate_nutrition(
    goal: Goal,
    weight_pct: f64,
    notes: &mut Vec<String>,
    action: &mut String,
) -> (i64, i64) {
    match goal {
        Goal::Cut => {
            if weight_pct > -0.25 {
                *action = "-150 kcal or +1k steps".into();
                notes.push("Cut: weight loss under 0.25%/wk; drop 150 kcal or add 1k steps/day.".into());
                (-150, 1000)
            } else {
                notes.push("Cut: rate of loss looks fine; keep calories.".into());
                (0, 0)
            }
        }
        Goal::Bulk => {
            if weight_pct > 0.7 {
                *action = "-100 kcal".into();
                notes.push("Bulk: gaining over 0.7%/wk; reduce 100 kcal.".into());
                (-100, 0)
            } else if weight_pct < 0.25 {
                *action = "+100 kcal".into();
                notes.push("Bulk: gaining under 0.25%/wk; add 100 kcal.".into());
                (100, 0)
            } else {
                notes.push("Bulk: gain rate on target; keep calories.".into());
                (0, 0)
            }
        }
        Goal::Recomp => {
            notes.push("Recomp: keep calories steady unless adherence issues.".into());
            (0, 0)
        }
    }
}

/// Week-over-week weight change in percent; 0 when the start weight is 0
pub fn weight_change_pct(weight_start: f64, weight_end: f64) -> f64 {
    if weight_start == 0.0 {
        return 0.0;
    }
    (weight_end - weight_start) / weight_start * 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
