//! Program and adjustment-event persistence.
//!
//! The adaptation engine only consumes the [`ProgramStore`] contract; the
//! file-backed implementation here stores one JSON blob per user (full
//! replace on save) and appends adjustment events to a JSONL file, with
//! file locking and atomic renames to survive concurrent writers.

use crate::types::{AdjustmentEvent, Program};
use crate::{Error, Result};
use chrono::Utc;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persistence contract consumed by the weekly adaptation engine
pub trait ProgramStore {
    /// Fetch the user's latest program, or None if they have none
    fn load_latest(&self, user_id: u64) -> Result<Option<Program>>;

    /// Full replace of the user's stored program blob
    fn save_program(&self, program: &Program) -> Result<()>;

    /// Append an adjustment event to the audit log
    fn append_event(&self, event: &AdjustmentEvent) -> Result<()>;

    /// Persist a reviewed program together with its adjustment event.
    ///
    /// Implementations must make this all-or-nothing: an event is recorded
    /// if and only if the program mutation is durably saved.
    fn commit_review(&self, program: &Program, event: &AdjustmentEvent) -> Result<()>;
}

/// File-backed store rooted at a data directory
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the store, ensuring its directory layout exists
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        std::fs::create_dir_all(store.programs_dir())?;
        Ok(store)
    }

    fn programs_dir(&self) -> PathBuf {
        self.root.join("programs")
    }

    fn program_path(&self, user_id: u64) -> PathBuf {
        self.programs_dir().join(format!("{}.json", user_id))
    }

    pub fn events_path(&self) -> PathBuf {
        self.root.join("adjustments.jsonl")
    }
}

impl ProgramStore for FileStore {
    /// Load the user's latest program with shared locking
    ///
    /// A missing file means no program exists. A file that cannot be parsed
    /// is recovered as an empty-day program so the review cycle can still
    /// run; the warning is the only trace of the discarded structure.
    fn load_latest(&self, user_id: u64) -> Result<Option<Program>> {
        let path = self.program_path(user_id);
        if !path.exists() {
            tracing::debug!("No stored program for user {}", user_id);
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        match serde_json::from_str::<Program>(&contents) {
            Ok(program) => {
                tracing::debug!("Loaded program for user {} from {:?}", user_id, path);
                Ok(Some(program))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse stored program {:?}: {}. Substituting empty program.",
                    path,
                    e
                );
                Ok(Some(Program::empty(user_id, Utc::now())))
            }
        }
    }

    /// Save a program atomically: temp file, sync, rename over the original
    fn save_program(&self, program: &Program) -> Result<()> {
        let path = self.program_path(program.user_id);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "program path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(program)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved program for user {} to {:?}", program.user_id, path);
        Ok(())
    }

    /// Append one event as a JSON line under an exclusive lock
    fn append_event(&self, event: &AdjustmentEvent) -> Result<()> {
        let path = self.events_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended adjustment event {} for user {}", event.id, event.user_id);
        Ok(())
    }

    /// Both writes or neither: on event failure the previous program blob is
    /// restored before the error propagates.
    fn commit_review(&self, program: &Program, event: &AdjustmentEvent) -> Result<()> {
        let path = self.program_path(program.user_id);
        let previous = std::fs::read(&path).ok();

        self.save_program(program)?;

        if let Err(e) = self.append_event(event) {
            match previous {
                Some(bytes) => {
                    if let Err(restore_err) = std::fs::write(&path, bytes) {
                        tracing::warn!(
                            "Rollback of program {:?} failed: {}",
                            path,
                            restore_err
                        );
                    }
                }
                None => {
                    let _ = std::fs::remove_file(&path);
                }
            }
            return Err(e);
        }

        Ok(())
    }
}

/// Read all adjustment events from a JSONL file
///
/// Unparseable lines are skipped with a warning rather than failing the
/// whole read.
pub fn read_events(path: &Path) -> Result<Vec<AdjustmentEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<AdjustmentEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse event at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::SplitId;
    use crate::types::{AdjustmentDiff, Goal, NutritionMeta, WeeklyReviewInput};
    use uuid::Uuid;

    fn test_program(user_id: u64) -> Program {
        Program {
            user_id,
            split: SplitId::Ppl,
            days: vec![],
            nutrition: NutritionMeta::default(),
            created_at: Utc::now(),
        }
    }

    fn test_event(user_id: u64) -> AdjustmentEvent {
        AdjustmentEvent {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            reason: "weekly_auto_adjust".into(),
            payload: AdjustmentDiff {
                training_changed_exercises: vec![],
                training_action: "maintain".into(),
                nutrition_kcal_delta: 0,
                nutrition_steps_delta: 0,
                weight_week_change_pct: 0.0,
                inputs: WeeklyReviewInput {
                    user_id,
                    train_completion_pct: 80.0,
                    avg_rpe: 7.0,
                    avg_soreness: 3.0,
                    sleep_hours: 7.5,
                    weight_start: 80.0,
                    weight_end: 80.0,
                    goal: Goal::Recomp,
                    steps_avg: 8000,
                    calories: 2500,
                },
                note: "test".into(),
            },
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        let program = test_program(1);
        store.save_program(&program).unwrap();

        let loaded = store.load_latest(1).unwrap().unwrap();
        assert_eq!(loaded, program);
    }

    #[test]
    fn test_load_absent_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        assert!(store.load_latest(42).unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_previous_program() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        store.save_program(&test_program(1)).unwrap();
        let mut newer = test_program(1);
        newer.nutrition.current_calories = Some(2200);
        store.save_program(&newer).unwrap();

        let loaded = store.load_latest(1).unwrap().unwrap();
        assert_eq!(loaded.nutrition.current_calories, Some(2200));
    }

    #[test]
    fn test_corrupted_program_recovers_to_empty_days() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        let path = temp_dir.path().join("programs").join("7.json");
        std::fs::write(&path, "{ not valid json }").unwrap();

        let loaded = store.load_latest(7).unwrap().unwrap();
        assert_eq!(loaded.user_id, 7);
        assert!(loaded.days.is_empty());
    }

    #[test]
    fn test_append_and_read_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        store.append_event(&test_event(1)).unwrap();
        store.append_event(&test_event(1)).unwrap();

        let events = read_events(&store.events_path()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].reason, "weekly_auto_adjust");
    }

    #[test]
    fn test_read_events_empty_when_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let events = read_events(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_commit_review_writes_both() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        let mut program = test_program(3);
        program.nutrition.recommendation = Some("-150 kcal or +1k steps".into());
        store.commit_review(&program, &test_event(3)).unwrap();

        let loaded = store.load_latest(3).unwrap().unwrap();
        assert_eq!(
            loaded.nutrition.recommendation.as_deref(),
            Some("-150 kcal or +1k steps")
        );
        assert_eq!(read_events(&store.events_path()).unwrap().len(), 1);
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();

        store.save_program(&test_program(5)).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path().join("programs"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "5.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only 5.json, found extras: {:?}",
            extras
        );
    }
}
