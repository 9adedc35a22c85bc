//! Skill ladder stage selection.
//!
//! A skill's exercises form a difficulty-ordered ladder; the user's current
//! rung is the first exercise that is unlocked but not yet mastered. The
//! mastered set is computed globally across the whole catalog because
//! prerequisites legitimately span skills and patterns.

use crate::mastery::mastered_set;
use crate::types::{Catalog, Exercise, ExerciseHistory};
use crate::unlock::is_unlocked;

/// Distinct skill tags in catalog order.
pub fn skills(catalog: &Catalog) -> Vec<String> {
    let mut seen = Vec::new();
    for ex in catalog.iter() {
        if let Some(skill) = &ex.skill {
            if !seen.contains(skill) {
                seen.push(skill.clone());
            }
        }
    }
    seen
}

/// Find the user's current rung on a skill ladder.
///
/// Returns the easiest unlocked-but-unmastered exercise tagged with this
/// skill. Returns None when the skill tag matches nothing in the catalog
/// (misconfiguration) or when no unlocked, unmastered rung remains - the
/// skill is maxed and the caller should rotate elsewhere rather than
/// repeat the hardest exercise for no new stimulus.
pub fn current_stage<'a>(
    catalog: &'a Catalog,
    skill: &str,
    history: &ExerciseHistory,
) -> Option<&'a Exercise> {
    let mut ladder: Vec<&Exercise> = catalog
        .iter()
        .filter(|ex| ex.skill.as_deref() == Some(skill))
        .collect();

    if ladder.is_empty() {
        tracing::warn!("Skill '{}' matches no catalog exercises", skill);
        return None;
    }

    // Stable sort: difficulty ties keep catalog order for determinism
    ladder.sort_by_key(|ex| ex.difficulty_score);

    let mastered = mastered_set(catalog, history);

    for ex in &ladder {
        let unlocked = is_unlocked(catalog, &ex.id, &mastered);
        let done = mastered.contains(&ex.id);
        tracing::debug!(
            "Skill '{}': {} (diff {}) unlocked={} mastered={}",
            skill,
            ex.id,
            ex.difficulty_score,
            unlocked,
            done
        );
        if unlocked && !done {
            return Some(ex);
        }
    }

    tracing::info!("Skill '{}' has no open rung; signaling rotation", skill);
    None
}
