//! Weekly split selection.
//!
//! Maps the number of training days to a split identifier and the ordered
//! day labels for that split. Pure lookup, no hidden state.

use crate::types::MuscleGroup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a weekly training split
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SplitId {
    #[serde(rename = "UL")]
    Ul,
    #[serde(rename = "ULx2")]
    Ulx2,
    #[serde(rename = "PPL")]
    Ppl,
    #[serde(rename = "PPL+UL")]
    PplUl,
    #[serde(rename = "PPLx2")]
    Pplx2,
}

impl SplitId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitId::Ul => "UL",
            SplitId::Ulx2 => "ULx2",
            SplitId::Ppl => "PPL",
            SplitId::PplUl => "PPL+UL",
            SplitId::Pplx2 => "PPLx2",
        }
    }

    /// Fixed rationale for why this split fits the chosen day count
    pub fn rationale(&self) -> &'static str {
        match self {
            SplitId::Ul => {
                "1-2 days: Upper/Lower covers the whole body with enough volume per session."
            }
            SplitId::Ppl => {
                "3 days: Push/Pull/Legs hits each movement pattern once per week with balanced fatigue."
            }
            SplitId::Ulx2 => {
                "4 days: Upper/Lower twice weekly raises per-muscle frequency to 2x for faster progress."
            }
            SplitId::PplUl => {
                "5 days: PPL plus an Upper/Lower pair balances frequency against recovery."
            }
            SplitId::Pplx2 => {
                "6 days: PPL twice weekly supports experienced lifters with higher volume."
            }
        }
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label of a training day within a split
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DayLabel {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
}

impl DayLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayLabel::Push => "Push",
            DayLabel::Pull => "Pull",
            DayLabel::Legs => "Legs",
            DayLabel::Upper => "Upper",
            DayLabel::Lower => "Lower",
        }
    }

    /// Ordered muscle-group template for this day label
    pub fn muscle_template(&self) -> &'static [MuscleGroup] {
        use MuscleGroup::*;
        match self {
            DayLabel::Push => &[Chest, Delts, Triceps],
            DayLabel::Pull => &[Lats, MidBack, Biceps],
            DayLabel::Legs | DayLabel::Lower => &[Quads, Hamstrings, Glutes, Calves, Core],
            DayLabel::Upper => &[Chest, MidBack, Delts, Lats, Triceps, Biceps],
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the split and ordered day labels for a weekly day count
///
/// Total over all inputs; out-of-range day counts fall back to PPL.
pub fn select_split(days_per_week: u8) -> (SplitId, Vec<DayLabel>) {
    use DayLabel::*;
    match days_per_week {
        1 | 2 => (SplitId::Ul, vec![Upper, Lower]),
        3 => (SplitId::Ppl, vec![Push, Pull, Legs]),
        4 => (SplitId::Ulx2, vec![Upper, Lower, Upper, Lower]),
        5 => (SplitId::PplUl, vec![Push, Pull, Legs, Upper, Lower]),
        6 => (SplitId::Pplx2, vec![Push, Pull, Legs, Push, Pull, Legs]),
        _ => (SplitId::Ppl, vec![Push, Pull, Legs]),
    }
}
