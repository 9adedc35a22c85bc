//! Core domain types for the Calispro progression engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their prescription ranges
//! - The read-only exercise catalog
//! - Normalized session history
//! - Readiness scores and generated workout plans

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Movement pattern an exercise belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    Push,
    Pull,
    Legs,
    Core,
    SkillFullBody,
}

/// Which unit an exercise's performance is measured in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Reps,
    Seconds,
}

/// Target ranges for an exercise; only the fields matching the exercise's
/// metric type are meaningful.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DefaultPrescription {
    #[serde(default)]
    pub reps_min: u32,
    #[serde(default)]
    pub reps_max: u32,
    #[serde(default)]
    pub seconds_min: u32,
    #[serde(default)]
    pub seconds_max: u32,
    #[serde(default = "default_sets")]
    pub sets: u32,
}

fn default_sets() -> u32 {
    3
}

/// An exercise definition (e.g., "Wall Handstand Hold")
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub pattern: MovementPattern,
    /// Skill ladder this exercise is a rung of (e.g. "handstand");
    /// None for pattern-only exercises.
    #[serde(default)]
    pub skill: Option<String>,
    pub difficulty_score: i32,
    pub metric_type: MetricType,
    pub default_prescription: DefaultPrescription,
    /// Exercise ids that must all be mastered before this one unlocks.
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Forward edges toward harder exercises. Stored redundantly with
    /// `prerequisites`; the engine treats prerequisites as authoritative.
    #[serde(default)]
    pub progresses_to: Vec<String>,
    /// Required equipment tags; the literal "none" means bodyweight only.
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub primary_muscles: Vec<String>,
}

impl Exercise {
    /// Mastery target in the exercise's own metric (reps_max or seconds_max).
    ///
    /// Returns None if the catalog carries a zero/absent target, so a
    /// malformed entry can never be spuriously mastered.
    pub fn mastery_target(&self) -> Option<u32> {
        let target = match self.metric_type {
            MetricType::Reps => self.default_prescription.reps_max,
            MetricType::Seconds => self.default_prescription.seconds_max,
        };
        (target > 0).then_some(target)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// The complete read-only exercise catalog.
///
/// Insertion order is preserved and used for deterministic tie-breaking
/// wherever difficulty scores collide.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    exercises: Vec<Exercise>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from an ordered exercise list.
    ///
    /// A duplicate id keeps its first binding in the lookup index;
    /// `validate()` reports the duplication.
    pub fn new(exercises: Vec<Exercise>) -> Self {
        let mut index = HashMap::with_capacity(exercises.len());
        for (i, ex) in exercises.iter().enumerate() {
            index.entry(ex.id.clone()).or_insert(i);
        }
        Self { exercises, index }
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.index.get(id).map(|&i| &self.exercises[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate exercises in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

// ============================================================================
// Session History
// ============================================================================

/// One normalized logged attempt at one exercise.
///
/// Defaults are resolved once at the history-provider boundary: a record
/// missing `rpe` gets 3, a record missing `goal_met` gets true.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    /// Reps or seconds, matching the exercise's metric type.
    #[serde(default)]
    pub performed_value: u32,
    /// Perceived effort 1-5; 5 is maximal/failed effort.
    #[serde(default = "default_rpe")]
    pub rpe: u8,
    /// Explicit confirmation the prescribed target was achieved as intended.
    #[serde(default = "default_goal_met")]
    pub goal_met: bool,
}

fn default_rpe() -> u8 {
    3
}

fn default_goal_met() -> bool {
    true
}

/// Per-exercise session history, rebuilt fresh for every engine call.
#[derive(Clone, Debug, Default)]
pub struct ExerciseHistory {
    sessions: HashMap<String, Vec<Session>>,
}

impl ExerciseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, exercise_id: impl Into<String>, session: Session) {
        self.sessions
            .entry(exercise_id.into())
            .or_default()
            .push(session);
    }

    /// Sessions logged for one exercise, oldest first. Empty if never logged.
    pub fn sessions_for(&self, exercise_id: &str) -> &[Session] {
        self.sessions
            .get(exercise_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Session>)> {
        self.sessions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Distinct calendar dates on which anything was logged, newest first.
    pub fn distinct_dates_desc(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> =
            self.sessions.values().flatten().map(|s| s.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.reverse();
        dates
    }
}

// ============================================================================
// Derived Outputs
// ============================================================================

/// Per-category readiness sub-scores, each 0-100.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessBreakdown {
    pub push: u32,
    pub pull: u32,
    pub legs: u32,
    pub core: u32,
    pub skills: u32,
}

/// Composite 0-100 readiness metric across movement categories.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub total_score: u32,
    pub breakdown: ReadinessBreakdown,
}

/// Manual difficulty override for on-demand workouts.
///
/// Maps to a representative readiness score so the volume tiers apply
/// uniformly whether the score was computed or chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn representative_score(self) -> u32 {
        match self {
            Level::Beginner => 25,
            Level::Intermediate => 55,
            Level::Advanced => 85,
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

/// Role an exercise plays within a generated workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SlotKind {
    Skill,
    Strength,
    Core,
    Accessory,
}

/// An exercise bound to a computed set count and rendered target range
/// for one specific generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub slot: SlotKind,
    pub exercise_id: String,
    pub name: String,
    pub muscle_group: String,
    pub difficulty_score: i32,
    pub sets: u32,
    /// Display string, e.g. "8-12" or "20-30s".
    pub target: String,
}

/// A generated daily workout, handed to the persistence sink for storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub name: String,
    pub description: String,
    pub skill_id: Option<String>,
    pub readiness_score: u32,
    /// Filled slots sorted by ascending difficulty. May hold fewer than
    /// four entries when a slot's candidate pool was empty.
    pub exercises: Vec<PlannedExercise>,
}

/// A locked prerequisite ranked by how much content mastering it would open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockKey {
    pub exercise_id: String,
    pub unlock_count: usize,
}

// ============================================================================
// Stored Records
// ============================================================================

/// Completion status of a stored workout record
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Pending,
    Completed,
    Skipped,
}

/// One exercise entry inside a logged workout.
///
/// Fields are optional because legacy logging paths omitted them; the
/// history provider resolves the documented defaults exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedExercise {
    pub exercise_id: String,
    #[serde(default)]
    pub performed_value: Option<u32>,
    /// Target the plan prescribed; used as the performed-value fallback
    /// when the user confirmed without editing.
    #[serde(default)]
    pub prescribed_value: Option<u32>,
    #[serde(default)]
    pub rpe: Option<u8>,
    #[serde(default)]
    pub goal_met: Option<bool>,
}

/// A logged workout as persisted in the workout log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub status: WorkoutStatus,
    /// Workout-level effort feedback; per-exercise values take precedence.
    #[serde(default)]
    pub rpe: Option<u8>,
    #[serde(default)]
    pub goal_met: Option<bool>,
    pub exercises: Vec<LoggedExercise>,
}

/// A stored generated plan with scheduling metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub status: WorkoutStatus,
    pub plan: WorkoutPlan,
}
