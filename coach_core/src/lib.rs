#![forbid(unsafe_code)]

//! Core domain model and business logic for the coaching system.
//!
//! This crate provides:
//! - Domain types (exercises, programs, prescriptions, review inputs)
//! - Exercise catalog and constraint filtering
//! - Split selection and program building
//! - Nutrition calculation
//! - Weekly adaptation engine
//! - Persistence (program store, adjustment-event log)

pub mod builder;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod nutrition;
pub mod plan;
pub mod review;
pub mod split;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use builder::{build_program, BuiltProgram, ProgressionModel};
pub use catalog::{build_default_catalog, filter, get_default_catalog, Catalog};
pub use config::Config;
pub use error::{Error, Result};
pub use nutrition::{compute_targets, meal_templates, ActivityStrategy};
pub use plan::{generate_plan, PlanResponse};
pub use review::run_weekly_review;
pub use split::{select_split, DayLabel, SplitId};
pub use store::{read_events, FileStore, ProgramStore};
pub use types::*;
