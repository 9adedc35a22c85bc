//! Mastery evaluation over session history.
//!
//! An exercise is mastered once two lifetime sessions each hit the target
//! value at a sub-maximal effort with the goal confirmed. This is a
//! consistency rule, not a rolling window: qualifying sessions never expire.

use crate::types::{Catalog, Exercise, ExerciseHistory, Session};
use std::collections::HashSet;

/// Number of qualifying sessions required for mastery
const MASTERY_SESSION_COUNT: usize = 2;

/// RPE above which a session never counts toward mastery (5 = maximal/failed)
const MASTERY_MAX_RPE: u8 = 4;

/// Whether a single session qualifies toward mastery at the given target.
fn session_qualifies(session: &Session, target: u32) -> bool {
    session.performed_value >= target && session.rpe <= MASTERY_MAX_RPE && session.goal_met
}

/// Decide whether an exercise is mastered given its session history.
///
/// Requires at least two sessions that each independently satisfy:
/// - performed value >= the metric's max target,
/// - rpe <= 4,
/// - goal confirmed (missing values were defaulted to true upstream).
///
/// An exercise with no sessions, or with a malformed zero target in the
/// catalog, is never mastered.
pub fn is_mastered(exercise: &Exercise, sessions: &[Session]) -> bool {
    let Some(target) = exercise.mastery_target() else {
        tracing::warn!(
            "Exercise '{}' has no usable mastery target; treating as unmastered",
            exercise.id
        );
        return false;
    };

    let qualifying = sessions
        .iter()
        .filter(|s| session_qualifies(s, target))
        .count();

    qualifying >= MASTERY_SESSION_COUNT
}

/// Compute the full mastered set across the catalog.
///
/// Recomputed from history on every call; there is no persisted mastery
/// flag to go stale.
pub fn mastered_set(catalog: &Catalog, history: &ExerciseHistory) -> HashSet<String> {
    catalog
        .iter()
        .filter(|ex| is_mastered(ex, history.sessions_for(&ex.id)))
        .map(|ex| ex.id.clone())
        .collect()
}

/// Whether the last two sessions both failed their goal.
///
/// Surfaced as a step-down suggestion for callers; deliberately not wired
/// into workout synthesis (see DESIGN.md).
pub fn regression_suggested(sessions: &[Session]) -> bool {
    if sessions.len() < 2 {
        return false;
    }
    sessions[sessions.len() - 2..].iter().all(|s| !s.goal_met)
}
