//! Workout synthesis engine.
//!
//! Composes a four-slot daily workout (Skill / Strength / Core / Accessory)
//! from the catalog, the user's history, and their equipment. Selection is
//! deterministic except for explicit difficulty-tie breaks, which route
//! through a caller-supplied randomness source so tests can seed it.

use crate::mastery::mastered_set;
use crate::readiness;
use crate::skill::{current_stage, skills};
use crate::types::{
    Catalog, Exercise, ExerciseHistory, Level, MetricType, MovementPattern, PlannedExercise,
    SlotKind, WorkoutPlan,
};
use crate::unlock::{find_unlock_keys, is_unlocked};
use crate::{Error, Result};
use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashSet;

/// Inputs for one workout generation
#[derive(Clone, Debug)]
pub struct GenerationRequest<'a> {
    /// Skill to focus on; None goes straight to the push/pull fallback.
    pub target_skill: Option<&'a str>,
    /// Caller's available equipment tags.
    pub equipment: &'a HashSet<String>,
    /// Date for time-relative logic (readiness window, repetition filter).
    pub reference_date: NaiveDate,
    /// Manual difficulty override; replaces the computed readiness score
    /// for volume and prescription purposes.
    pub level: Option<Level>,
}

/// How the target range is rendered for this generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VolumeMode {
    Min,
    MidToMax,
    Max,
}

/// Volume tier derived from the effective readiness score
struct VolumeTier {
    sets: u32,
    mode: VolumeMode,
    label: &'static str,
}

fn volume_tier(score: u32) -> VolumeTier {
    if score < 30 {
        VolumeTier {
            sets: 2,
            mode: VolumeMode::Min,
            label: "Technical focus (recovery)",
        }
    } else if score < 60 {
        VolumeTier {
            sets: 3,
            mode: VolumeMode::MidToMax,
            label: "Moderate focus",
        }
    } else {
        VolumeTier {
            sets: 4,
            mode: VolumeMode::Max,
            label: "Strength focus (progression)",
        }
    }
}

/// Generate a balanced daily workout.
///
/// Returns `Error::Generation` only when no skill-equivalent exercise
/// exists anywhere after equipment filtering; other unfillable slots are
/// simply omitted from the plan.
pub fn generate(
    catalog: &Catalog,
    history: &ExerciseHistory,
    request: &GenerationRequest,
    rng: &mut impl Rng,
) -> Result<WorkoutPlan> {
    let readiness = readiness::score(catalog, history, request.reference_date);
    let effective_score = request
        .level
        .map(Level::representative_score)
        .unwrap_or(readiness.total_score);

    tracing::info!(
        "Generating workout: skill={:?} score={} (computed {})",
        request.target_skill,
        effective_score,
        readiness.total_score
    );

    let mastered = mastered_set(catalog, history);
    let stale = stale_exercises(history);

    let equipment_ok = |ex: &Exercise| -> bool {
        ex.equipment
            .iter()
            .all(|tag| tag == "none" || request.equipment.contains(tag))
    };

    // 1. Skill slot: target skill, then rotation, then unlock keys, then
    // the hardest unlocked push/pull work.
    let (skill_exercise, skill_id) =
        select_skill_slot(catalog, history, request, &mastered, &equipment_ok, rng)?;

    let mut used: HashSet<&str> = HashSet::new();
    used.insert(skill_exercise.id.as_str());

    let pool = |pattern: MovementPattern, used: &HashSet<&str>| -> Vec<&Exercise> {
        catalog
            .iter()
            .filter(|ex| ex.pattern == pattern)
            .filter(|ex| !used.contains(ex.id.as_str()))
            .filter(|ex| is_unlocked(catalog, &ex.id, &mastered))
            .filter(|ex| equipment_ok(ex))
            .collect()
    };

    // 2. Strength slot: same movement pattern as the skill work
    let strength_pattern = match skill_exercise.pattern {
        MovementPattern::SkillFullBody => MovementPattern::Push,
        other => other,
    };
    let strength = select_from_pool(pool(strength_pattern, &used), &mastered, &stale, rng);
    if let Some(ex) = strength {
        used.insert(ex.id.as_str());
    }

    // 3. Core slot
    let core = select_from_pool(pool(MovementPattern::Core, &used), &mastered, &stale, rng);
    if let Some(ex) = core {
        used.insert(ex.id.as_str());
    }

    // 4. Accessory slot: antagonist of the strength pattern
    let accessory_pattern = match strength_pattern {
        MovementPattern::Push => MovementPattern::Pull,
        MovementPattern::Pull => MovementPattern::Push,
        MovementPattern::Legs => MovementPattern::Core,
        MovementPattern::Core => MovementPattern::Legs,
        MovementPattern::SkillFullBody => MovementPattern::Pull,
    };
    let accessory =
        select_from_pool(pool(accessory_pattern, &used), &mastered, &stale, rng);

    let tier = volume_tier(effective_score);

    let mut exercises: Vec<PlannedExercise> = [
        (SlotKind::Skill, Some(skill_exercise)),
        (SlotKind::Strength, strength),
        (SlotKind::Core, core),
        (SlotKind::Accessory, accessory),
    ]
    .into_iter()
    .filter_map(|(slot, ex)| ex.map(|ex| plan_exercise(slot, ex, &tier)))
    .collect();

    // Display order: easiest first, regardless of slot type
    exercises.sort_by_key(|e| e.difficulty_score);

    let title = skill_id
        .as_deref()
        .map(display_title)
        .unwrap_or_else(|| "Conditioning".to_string());

    Ok(WorkoutPlan {
        name: format!("{} Focus", title),
        description: tier.label.to_string(),
        skill_id,
        readiness_score: effective_score,
        exercises,
    })
}

/// Resolve the skill slot through the full fallback chain.
fn select_skill_slot<'a>(
    catalog: &'a Catalog,
    history: &ExerciseHistory,
    request: &GenerationRequest,
    mastered: &HashSet<String>,
    equipment_ok: &impl Fn(&Exercise) -> bool,
    rng: &mut impl Rng,
) -> Result<(&'a Exercise, Option<String>)> {
    if let Some(target) = request.target_skill {
        // Target skill first, then every other ladder in catalog order
        let mut order = vec![target.to_string()];
        order.extend(skills(catalog).into_iter().filter(|s| s != target));

        for skill in &order {
            if let Some(stage) = current_stage(catalog, skill, history) {
                if equipment_ok(stage) {
                    if skill != target {
                        tracing::info!("Rotated from '{}' to '{}'", target, skill);
                    }
                    return Ok((stage, Some(skill.clone())));
                }
                tracing::debug!(
                    "Stage '{}' for skill '{}' fails equipment filter",
                    stage.id,
                    skill
                );
            }
        }

        // Every ladder is maxed or unreachable: prefer opening new content
        // over repeating mastered work.
        for key in find_unlock_keys(catalog, mastered) {
            let Some(ex) = catalog.get(&key.exercise_id) else {
                continue; // dangling prerequisite, already warned about
            };
            if is_unlocked(catalog, &ex.id, mastered) && equipment_ok(ex) {
                tracing::info!(
                    "All skills maxed; targeting unlock key '{}' (opens {})",
                    ex.id,
                    key.unlock_count
                );
                return Ok((ex, ex.skill.clone()));
            }
        }
    }

    // Push/pull fallback: the single hardest unlocked candidate
    let candidates: Vec<&Exercise> = catalog
        .iter()
        .filter(|ex| {
            ex.pattern == MovementPattern::Push || ex.pattern == MovementPattern::Pull
        })
        .filter(|ex| is_unlocked(catalog, &ex.id, mastered))
        .filter(|ex| equipment_ok(ex))
        .collect();

    match pick_extreme(&candidates, rng, Extreme::Hardest) {
        Some(ex) => Ok((ex, None)),
        None => Err(Error::Generation("no exercise available".into())),
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Easiest,
    Hardest,
}

/// Pick the easiest or hardest candidate, breaking difficulty ties
/// uniformly at random.
fn pick_extreme<'a>(
    candidates: &[&'a Exercise],
    rng: &mut impl Rng,
    extreme: Extreme,
) -> Option<&'a Exercise> {
    let scores = candidates.iter().map(|ex| ex.difficulty_score);
    let pivot = match extreme {
        Extreme::Easiest => scores.min()?,
        Extreme::Hardest => scores.max()?,
    };
    let tied: Vec<&Exercise> = candidates
        .iter()
        .copied()
        .filter(|ex| ex.difficulty_score == pivot)
        .collect();
    Some(tied[rng.gen_range(0..tied.len())])
}

/// Selection policy for the strength/core/accessory slots.
///
/// Unmastered candidates progress easiest-first (gradual overload); a pool
/// of only mastered candidates falls back to the hardest as maintenance
/// work. Exercises trained on both of the last two session dates are
/// excluded first, unless doing so would empty the pool entirely.
fn select_from_pool<'a>(
    candidates: Vec<&'a Exercise>,
    mastered: &HashSet<String>,
    stale: &HashSet<String>,
    rng: &mut impl Rng,
) -> Option<&'a Exercise> {
    if candidates.is_empty() {
        return None;
    }

    let fresh: Vec<&Exercise> = candidates
        .iter()
        .copied()
        .filter(|ex| !stale.contains(&ex.id))
        .collect();
    let pool = if fresh.is_empty() { candidates } else { fresh };

    let unmastered: Vec<&Exercise> = pool
        .iter()
        .copied()
        .filter(|ex| !mastered.contains(&ex.id))
        .collect();

    if unmastered.is_empty() {
        pick_extreme(&pool, rng, Extreme::Hardest)
    } else {
        pick_extreme(&unmastered, rng, Extreme::Easiest)
    }
}

/// Exercises trained on both of the two most recent distinct session dates.
fn stale_exercises(history: &ExerciseHistory) -> HashSet<String> {
    let global_dates = history.distinct_dates_desc();
    if global_dates.len() < 2 {
        return HashSet::new();
    }
    let (last, prev) = (global_dates[0], global_dates[1]);

    history
        .iter()
        .filter(|(_, sessions)| {
            let dates: HashSet<NaiveDate> = sessions.iter().map(|s| s.date).collect();
            dates.contains(&last) && dates.contains(&prev)
        })
        .map(|(id, _)| id.clone())
        .collect()
}

/// Bind an exercise to this generation's volume tier.
fn plan_exercise(slot: SlotKind, exercise: &Exercise, tier: &VolumeTier) -> PlannedExercise {
    PlannedExercise {
        slot,
        exercise_id: exercise.id.clone(),
        name: exercise.name.clone(),
        muscle_group: exercise.primary_muscles.join("/"),
        difficulty_score: exercise.difficulty_score,
        sets: tier.sets,
        target: render_target(exercise, tier.mode),
    }
}

/// Render the target range string for one exercise under a volume mode.
fn render_target(exercise: &Exercise, mode: VolumeMode) -> String {
    let (min, max, suffix) = match exercise.metric_type {
        MetricType::Reps => (
            exercise.default_prescription.reps_min,
            exercise.default_prescription.reps_max,
            "",
        ),
        MetricType::Seconds => (
            exercise.default_prescription.seconds_min,
            exercise.default_prescription.seconds_max,
            "s",
        ),
    };

    match mode {
        VolumeMode::Min => format!("{min}{suffix}"),
        VolumeMode::MidToMax => format!("{}-{}{}", (min + max) / 2, max, suffix),
        VolumeMode::Max => format!("{max}{suffix}"),
    }
}

/// "front_lever" -> "Front Lever"
fn display_title(skill: &str) -> String {
    skill
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
