//! Exercise catalog: built-in defaults, JSON loading, and validation.
//!
//! The catalog is loaded once at startup and read-only thereafter. Every
//! engine function takes it by reference; nothing in this crate holds a
//! mutable global.

use crate::types::*;
use crate::Result;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// On-disk catalog document, versioned for deployment tooling
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    version: Option<String>,
    exercises: Vec<Exercise>,
}

impl Catalog {
    /// Parse a catalog from its versioned JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        tracing::info!(
            "Loaded catalog version {} with {} exercises",
            doc.version.as_deref().unwrap_or("unversioned"),
            doc.exercises.len()
        );
        Ok(Catalog::new(doc.exercises))
    }

    /// Load a catalog document from a file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate the catalog for consistency and completeness.
    ///
    /// Returns a list of diagnostics, or an empty Vec if valid. A non-empty
    /// result does not prevent the engine from running: dangling
    /// prerequisites degrade to permanently locked exercises, and cycles
    /// are reported but cannot hang the engine (all lock checks are
    /// single-hop).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashMap::new();

        for ex in self.iter() {
            if ex.id.is_empty() {
                errors.push("Exercise has empty ID".to_string());
            }
            if ex.name.is_empty() {
                errors.push(format!("Exercise '{}' has empty name", ex.id));
            }
            if seen.insert(ex.id.clone(), ()).is_some() {
                errors.push(format!("Duplicate exercise ID '{}'", ex.id));
            }
            if ex.mastery_target().is_none() {
                errors.push(format!(
                    "Exercise '{}' has a zero target for its metric type",
                    ex.id
                ));
            }

            for prereq in &ex.prerequisites {
                if !self.contains(prereq) {
                    errors.push(format!(
                        "Exercise '{}' references non-existent prerequisite '{}'",
                        ex.id, prereq
                    ));
                }
            }
            for next in &ex.progresses_to {
                if !self.contains(next) {
                    errors.push(format!(
                        "Exercise '{}' progresses to non-existent exercise '{}'",
                        ex.id, next
                    ));
                }
            }
        }

        errors.extend(self.find_prerequisite_cycles());
        errors
    }

    /// Detect cycles in the prerequisite graph.
    ///
    /// The graph is expected to be a DAG; a cycle makes its members
    /// permanently locked, which is worth surfacing to catalog authors.
    fn find_prerequisite_cycles(&self) -> Vec<String> {
        const UNVISITED: u8 = 0;
        const IN_PROGRESS: u8 = 1;
        const DONE: u8 = 2;

        let mut state: HashMap<&str, u8> = HashMap::new();
        let mut cycles = Vec::new();

        for start in self.iter() {
            if state.get(start.id.as_str()).copied().unwrap_or(UNVISITED) != UNVISITED {
                continue;
            }

            // Iterative DFS; (id, next child index) stack
            let mut stack: Vec<(&str, usize)> = vec![(start.id.as_str(), 0)];
            state.insert(start.id.as_str(), IN_PROGRESS);

            while let Some((id, child_idx)) = stack.pop() {
                let prereqs = self
                    .get(id)
                    .map(|ex| ex.prerequisites.as_slice())
                    .unwrap_or(&[]);

                if child_idx < prereqs.len() {
                    stack.push((id, child_idx + 1));
                    let child = prereqs[child_idx].as_str();
                    match state.get(child).copied().unwrap_or(UNVISITED) {
                        UNVISITED => {
                            if self.contains(child) {
                                state.insert(child, IN_PROGRESS);
                                stack.push((child, 0));
                            }
                        }
                        IN_PROGRESS => {
                            cycles.push(format!(
                                "Prerequisite cycle involving '{}' and '{}'",
                                id, child
                            ));
                        }
                        _ => {}
                    }
                } else {
                    state.insert(id, DONE);
                }
            }
        }

        cycles
    }
}

/// Builds the default catalog with built-in exercises.
///
/// Skill ladders: handstand, l_sit, front_lever. Pattern work covers push,
/// pull, legs, and core, with prerequisite edges crossing ladders where the
/// strength carryover is real (e.g. handstand work gated on pike push-ups).
pub fn build_default_catalog() -> Catalog {
    let mut exercises = Vec::new();

    // ========================================================================
    // Push
    // ========================================================================

    exercises.push(exercise(
        "incline_push_up",
        "Incline Push-up",
        MovementPattern::Push,
        None,
        1,
        MetricType::Reps,
        reps(6, 12, 3),
        &[],
        &["push_up"],
        &["none"],
        &["chest", "triceps"],
    ));
    exercises.push(exercise(
        "push_up",
        "Push-up",
        MovementPattern::Push,
        None,
        2,
        MetricType::Reps,
        reps(8, 15, 3),
        &["incline_push_up"],
        &["pike_push_up"],
        &["none"],
        &["chest", "triceps"],
    ));
    exercises.push(exercise(
        "pike_push_up",
        "Pike Push-up",
        MovementPattern::Push,
        None,
        3,
        MetricType::Reps,
        reps(6, 12, 3),
        &["push_up"],
        &["wall_handstand_hold", "pseudo_planche_push_up"],
        &["none"],
        &["shoulders", "triceps"],
    ));
    exercises.push(exercise(
        "pseudo_planche_push_up",
        "Pseudo Planche Push-up",
        MovementPattern::Push,
        None,
        5,
        MetricType::Reps,
        reps(5, 10, 3),
        &["pike_push_up"],
        &[],
        &["none"],
        &["shoulders", "chest"],
    ));

    // ========================================================================
    // Pull
    // ========================================================================

    exercises.push(exercise(
        "scapular_pull",
        "Scapular Pull",
        MovementPattern::Pull,
        None,
        1,
        MetricType::Reps,
        reps(6, 10, 3),
        &[],
        &["inverted_row"],
        &["pull_up_bar"],
        &["back", "scapula"],
    ));
    exercises.push(exercise(
        "inverted_row",
        "Inverted Row",
        MovementPattern::Pull,
        None,
        2,
        MetricType::Reps,
        reps(8, 12, 3),
        &[],
        &["pull_up"],
        &["low_bar"],
        &["back", "biceps"],
    ));
    exercises.push(exercise(
        "pull_up",
        "Pull-up",
        MovementPattern::Pull,
        None,
        4,
        MetricType::Reps,
        reps(5, 10, 3),
        &["inverted_row"],
        &["archer_pull_up", "skin_the_cat"],
        &["pull_up_bar"],
        &["back", "biceps"],
    ));
    exercises.push(exercise(
        "archer_pull_up",
        "Archer Pull-up",
        MovementPattern::Pull,
        None,
        6,
        MetricType::Reps,
        reps(3, 8, 3),
        &["pull_up"],
        &[],
        &["pull_up_bar"],
        &["back", "biceps"],
    ));

    // ========================================================================
    // Legs
    // ========================================================================

    exercises.push(exercise(
        "bodyweight_squat",
        "Bodyweight Squat",
        MovementPattern::Legs,
        None,
        1,
        MetricType::Reps,
        reps(10, 20, 3),
        &[],
        &["split_squat"],
        &["none"],
        &["quads", "glutes"],
    ));
    exercises.push(exercise(
        "split_squat",
        "Split Squat",
        MovementPattern::Legs,
        None,
        2,
        MetricType::Reps,
        reps(8, 12, 3),
        &["bodyweight_squat"],
        &["bulgarian_split_squat"],
        &["none"],
        &["quads", "glutes"],
    ));
    exercises.push(exercise(
        "bulgarian_split_squat",
        "Bulgarian Split Squat",
        MovementPattern::Legs,
        None,
        4,
        MetricType::Reps,
        reps(8, 12, 3),
        &["split_squat"],
        &["pistol_squat"],
        &["bench"],
        &["quads", "glutes"],
    ));
    exercises.push(exercise(
        "pistol_squat",
        "Pistol Squat",
        MovementPattern::Legs,
        None,
        6,
        MetricType::Reps,
        reps(4, 8, 3),
        &["bulgarian_split_squat"],
        &[],
        &["none"],
        &["quads", "glutes", "balance"],
    ));

    // ========================================================================
    // Core
    // ========================================================================

    exercises.push(exercise(
        "plank",
        "Plank",
        MovementPattern::Core,
        None,
        1,
        MetricType::Seconds,
        seconds(30, 60, 3),
        &[],
        &["hollow_body_hold"],
        &["none"],
        &["abs"],
    ));
    exercises.push(exercise(
        "hollow_body_hold",
        "Hollow Body Hold",
        MovementPattern::Core,
        None,
        2,
        MetricType::Seconds,
        seconds(20, 40, 3),
        &["plank"],
        &["dragon_flag_negative"],
        &["none"],
        &["abs"],
    ));
    exercises.push(exercise(
        "hanging_knee_raise",
        "Hanging Knee Raise",
        MovementPattern::Core,
        None,
        3,
        MetricType::Reps,
        reps(8, 12, 3),
        &[],
        &["dragon_flag_negative"],
        &["pull_up_bar"],
        &["abs", "hip_flexors"],
    ));
    exercises.push(exercise(
        "dragon_flag_negative",
        "Dragon Flag Negative",
        MovementPattern::Core,
        None,
        6,
        MetricType::Reps,
        reps(3, 6, 3),
        &["hollow_body_hold", "hanging_knee_raise"],
        &[],
        &["bench"],
        &["abs", "lats"],
    ));

    // ========================================================================
    // Skill: handstand
    // ========================================================================

    exercises.push(exercise(
        "wall_handstand_hold",
        "Wall Handstand Hold",
        MovementPattern::SkillFullBody,
        Some("handstand"),
        3,
        MetricType::Seconds,
        seconds(20, 45, 3),
        &["pike_push_up"],
        &["handstand_hold"],
        &["wall"],
        &["shoulders", "core"],
    ));
    exercises.push(exercise(
        "handstand_hold",
        "Freestanding Handstand Hold",
        MovementPattern::SkillFullBody,
        Some("handstand"),
        5,
        MetricType::Seconds,
        seconds(10, 30, 3),
        &["wall_handstand_hold"],
        &["handstand_push_up"],
        &["none"],
        &["shoulders", "core", "balance"],
    ));
    exercises.push(exercise(
        "handstand_push_up",
        "Handstand Push-up",
        MovementPattern::SkillFullBody,
        Some("handstand"),
        7,
        MetricType::Reps,
        reps(3, 8, 3),
        &["handstand_hold", "pseudo_planche_push_up"],
        &[],
        &["wall"],
        &["shoulders", "triceps"],
    ));

    // ========================================================================
    // Skill: l_sit
    // ========================================================================

    exercises.push(exercise(
        "l_sit_tuck",
        "Tuck L-Sit",
        MovementPattern::Core,
        Some("l_sit"),
        2,
        MetricType::Seconds,
        seconds(10, 20, 3),
        &[],
        &["l_sit_full"],
        &["none"],
        &["abs", "hip_flexors"],
    ));
    exercises.push(exercise(
        "l_sit_full",
        "L-Sit",
        MovementPattern::Core,
        Some("l_sit"),
        4,
        MetricType::Seconds,
        seconds(10, 20, 3),
        &["l_sit_tuck"],
        &["v_sit"],
        &["none"],
        &["abs", "hip_flexors"],
    ));
    exercises.push(exercise(
        "v_sit",
        "V-Sit",
        MovementPattern::Core,
        Some("l_sit"),
        7,
        MetricType::Seconds,
        seconds(5, 15, 3),
        &["l_sit_full"],
        &[],
        &["parallettes"],
        &["abs", "hip_flexors"],
    ));

    // ========================================================================
    // Skill: front_lever
    // ========================================================================

    exercises.push(exercise(
        "skin_the_cat",
        "Skin the Cat",
        MovementPattern::Pull,
        Some("front_lever"),
        3,
        MetricType::Reps,
        reps(3, 6, 3),
        &["pull_up"],
        &["front_lever_tuck"],
        &["pull_up_bar"],
        &["lats", "shoulders"],
    ));
    exercises.push(exercise(
        "front_lever_tuck",
        "Tuck Front Lever",
        MovementPattern::Pull,
        Some("front_lever"),
        5,
        MetricType::Seconds,
        seconds(10, 20, 3),
        &["skin_the_cat"],
        &["front_lever"],
        &["pull_up_bar"],
        &["lats", "core"],
    ));
    exercises.push(exercise(
        "front_lever",
        "Front Lever",
        MovementPattern::Pull,
        Some("front_lever"),
        8,
        MetricType::Seconds,
        seconds(5, 15, 3),
        &["front_lever_tuck"],
        &[],
        &["pull_up_bar"],
        &["lats", "core"],
    ));

    Catalog::new(exercises)
}

fn reps(min: u32, max: u32, sets: u32) -> DefaultPrescription {
    DefaultPrescription {
        reps_min: min,
        reps_max: max,
        seconds_min: 0,
        seconds_max: 0,
        sets,
    }
}

fn seconds(min: u32, max: u32, sets: u32) -> DefaultPrescription {
    DefaultPrescription {
        reps_min: 0,
        reps_max: 0,
        seconds_min: min,
        seconds_max: max,
        sets,
    }
}

#[allow(clippy::too_many_arguments)]
fn exercise(
    id: &str,
    name: &str,
    pattern: MovementPattern,
    skill: Option<&str>,
    difficulty_score: i32,
    metric_type: MetricType,
    default_prescription: DefaultPrescription,
    prerequisites: &[&str],
    progresses_to: &[&str],
    equipment: &[&str],
    primary_muscles: &[&str],
) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        pattern,
        skill: skill.map(Into::into),
        difficulty_score,
        metric_type,
        default_prescription,
        prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        progresses_to: progresses_to.iter().map(|s| s.to_string()).collect(),
        equipment: equipment.iter().map(|s| s.to_string()).collect(),
        primary_muscles: primary_muscles.iter().map(|s| s.to_string()).collect(),
    }
}
