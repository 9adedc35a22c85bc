//! Append-only JSONL persistence with file locking.
//!
//! Workouts and generated plans are appended to JSON Lines files under a
//! single data directory, with fs2 locking so concurrent invocations (a
//! shell running `plan` while a script runs `log`) never interleave writes.

use crate::types::{PlanRecord, WorkoutRecord};
use crate::Result;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Sink for completed/skipped workout records
pub trait WorkoutSink {
    fn append(&mut self, record: &WorkoutRecord) -> Result<()>;
}

/// All persistent files live under one directory.
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn workouts_path(&self) -> PathBuf {
        self.dir.join("workouts.jsonl")
    }

    pub fn plans_path(&self) -> PathBuf {
        self.dir.join("plans.jsonl")
    }

    pub fn append_workout(&self, record: &WorkoutRecord) -> Result<()> {
        append_record(&self.workouts_path(), record)?;
        tracing::debug!("Appended workout {} to log", record.id);
        Ok(())
    }

    pub fn append_plan(&self, record: &PlanRecord) -> Result<()> {
        append_record(&self.plans_path(), record)?;
        tracing::debug!("Appended plan {} to log", record.id);
        Ok(())
    }

    /// All stored workout records, oldest first. Corrupt lines are skipped
    /// with a warning rather than failing the whole read.
    pub fn read_workouts(&self) -> Result<Vec<WorkoutRecord>> {
        read_records(&self.workouts_path())
    }

    pub fn read_plans(&self) -> Result<Vec<PlanRecord>> {
        read_records(&self.plans_path())
    }
}

impl WorkoutSink for DataStore {
    fn append(&mut self, record: &WorkoutRecord) -> Result<()> {
        self.append_workout(record)
    }
}

fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    file.lock_exclusive()?;

    let mut writer = std::io::BufWriter::new(&file);
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    file.unlock()?;
    Ok(())
}

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping corrupt record at {:?} line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}
