//! Prerequisite lock state and unlock-key analysis.
//!
//! Lock checks are a single hop: mastering a prerequisite already proved its
//! own prerequisites at the time it was mastered, so the graph is validated
//! forward only and never re-walked here.

use crate::types::{Catalog, UnlockKey};
use std::collections::{HashMap, HashSet};

/// Whether an exercise is unlocked given the current mastered set.
///
/// True iff it has no prerequisites or every prerequisite id is mastered.
/// A prerequisite id absent from the catalog is unsatisfiable: the exercise
/// stays locked and a diagnostic is emitted, but the caller never sees an
/// error for it.
pub fn is_unlocked(catalog: &Catalog, exercise_id: &str, mastered: &HashSet<String>) -> bool {
    let Some(exercise) = catalog.get(exercise_id) else {
        tracing::warn!("Unlock check for unknown exercise '{}'", exercise_id);
        return false;
    };

    exercise.prerequisites.iter().all(|prereq| {
        if !catalog.contains(prereq) {
            tracing::warn!(
                "Exercise '{}' has prerequisite '{}' missing from catalog; treating as locked",
                exercise_id,
                prereq
            );
            return false;
        }
        mastered.contains(prereq)
    })
}

/// Find which unmastered prerequisites block the most content.
///
/// For every locked, unmastered exercise, each of its unsatisfied
/// prerequisites earns one impact point. Returned descending by impact,
/// ties in catalog order, so the top entry is the single exercise that
/// would unlock the most currently-blocked content if mastered next.
pub fn find_unlock_keys(catalog: &Catalog, mastered: &HashSet<String>) -> Vec<UnlockKey> {
    let mut impact: HashMap<&str, usize> = HashMap::new();

    for exercise in catalog.iter() {
        if mastered.contains(&exercise.id) {
            continue;
        }
        let unsatisfied: Vec<&String> = exercise
            .prerequisites
            .iter()
            .filter(|p| !mastered.contains(*p))
            .collect();
        if unsatisfied.is_empty() {
            continue; // already unlocked
        }
        for prereq in unsatisfied {
            *impact.entry(prereq.as_str()).or_insert(0) += 1;
        }
    }

    // Catalog order gives a stable base; prerequisites outside the catalog
    // sort after it but are still reported for diagnostics.
    let mut keys: Vec<UnlockKey> = impact
        .into_iter()
        .map(|(id, count)| UnlockKey {
            exercise_id: id.to_string(),
            unlock_count: count,
        })
        .collect();
    keys.sort_by_key(|k| {
        catalog
            .iter()
            .position(|ex| ex.id == k.exercise_id)
            .unwrap_or(usize::MAX)
    });
    keys.sort_by(|a, b| b.unlock_count.cmp(&a.unlock_count));
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;

    fn mastered(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_prerequisites_always_unlocked() {
        let catalog = build_default_catalog();
        assert!(is_unlocked(&catalog, "incline_push_up", &mastered(&[])));
    }

    #[test]
    fn test_locked_until_all_prerequisites_mastered() {
        let catalog = build_default_catalog();
        // dragon_flag_negative needs both hollow_body_hold and hanging_knee_raise
        assert!(!is_unlocked(
            &catalog,
            "dragon_flag_negative",
            &mastered(&["hollow_body_hold"])
        ));
        assert!(!is_unlocked(
            &catalog,
            "dragon_flag_negative",
            &mastered(&["hanging_knee_raise"])
        ));
        assert!(is_unlocked(
            &catalog,
            "dragon_flag_negative",
            &mastered(&["hollow_body_hold", "hanging_knee_raise"])
        ));
    }

    #[test]
    fn test_single_hop_only() {
        let catalog = build_default_catalog();
        // pull_up's own prerequisite chain is not re-walked: inverted_row in
        // the mastered set is enough, regardless of how it got there.
        assert!(is_unlocked(&catalog, "pull_up", &mastered(&["inverted_row"])));
    }

    #[test]
    fn test_unknown_exercise_stays_locked() {
        let catalog = build_default_catalog();
        assert!(!is_unlocked(&catalog, "nonexistent", &mastered(&[])));
    }

    #[test]
    fn test_missing_prerequisite_is_unsatisfiable() {
        use crate::types::*;
        let ex = Exercise {
            id: "orphan".into(),
            name: "Orphan".into(),
            pattern: MovementPattern::Push,
            skill: None,
            difficulty_score: 1,
            metric_type: MetricType::Reps,
            default_prescription: DefaultPrescription {
                reps_min: 5,
                reps_max: 10,
                seconds_min: 0,
                seconds_max: 0,
                sets: 3,
            },
            prerequisites: vec!["ghost".into()],
            progresses_to: vec![],
            equipment: vec!["none".into()],
            primary_muscles: vec![],
        };
        let catalog = Catalog::new(vec![ex]);

        // Even a "mastered" ghost cannot satisfy: the id is not in the catalog
        assert!(!is_unlocked(&catalog, "orphan", &mastered(&["ghost"])));
    }

    #[test]
    fn test_unlock_keys_count_blocked_content() {
        let catalog = build_default_catalog();
        let keys = find_unlock_keys(&catalog, &mastered(&[]));

        // pull_up blocks archer_pull_up and skin_the_cat from an empty set
        let pull_up = keys
            .iter()
            .find(|k| k.exercise_id == "pull_up")
            .expect("pull_up should be an unlock key");
        assert_eq!(pull_up.unlock_count, 2);

        // Descending by impact
        for pair in keys.windows(2) {
            assert!(pair[0].unlock_count >= pair[1].unlock_count);
        }
    }

    #[test]
    fn test_unlock_keys_shrink_as_mastery_grows() {
        let catalog = build_default_catalog();
        let before = find_unlock_keys(&catalog, &mastered(&[]));
        let after = find_unlock_keys(
            &catalog,
            &mastered(&["push_up", "incline_push_up", "pike_push_up"]),
        );

        // pike_push_up no longer blocks anything once mastered
        assert!(!after.iter().any(|k| k.exercise_id == "pike_push_up"));
        assert!(before.iter().any(|k| k.exercise_id == "pike_push_up"));
    }

    #[test]
    fn test_unlock_keys_empty_when_everything_reachable() {
        let catalog = build_default_catalog();
        let all: HashSet<String> = catalog.iter().map(|ex| ex.id.clone()).collect();
        assert!(find_unlock_keys(&catalog, &all).is_empty());
    }
}
