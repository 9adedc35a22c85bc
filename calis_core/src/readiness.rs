//! Composite readiness scoring.
//!
//! Five equally-weighted movement categories (push, pull, legs, core,
//! skills) each contribute a proficiency sub-score modulated by a recent
//! effort penalty, plus a global consistency bonus for training frequency
//! in the trailing week.

use crate::mastery::mastered_set;
use crate::types::{
    Catalog, Exercise, ExerciseHistory, MovementPattern, ReadinessBreakdown, ReadinessScore,
    Session,
};
use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Weight of each category in the composite score
const CATEGORY_WEIGHT: f64 = 0.20;

/// Sessions considered for the recent-effort penalty
const PENALTY_WINDOW: usize = 3;

/// Average RPE at which the fatigue penalty kicks in
const PENALTY_RPE_THRESHOLD: f64 = 4.0;

/// Multiplier applied to a category running hot
const PENALTY_FACTOR: f64 = 0.9;

/// Trailing window for the consistency bonus, in days
const CONSISTENCY_WINDOW_DAYS: i64 = 7;

/// Points per distinct training day in the window
const CONSISTENCY_POINTS_PER_DAY: u32 = 2;

/// Consistency bonus ceiling
const CONSISTENCY_BONUS_CAP: u32 = 10;

#[derive(Clone, Copy, Debug)]
enum Category {
    Push,
    Pull,
    Legs,
    Core,
    Skills,
}

impl Category {
    const ALL: [Category; 5] = [
        Category::Push,
        Category::Pull,
        Category::Legs,
        Category::Core,
        Category::Skills,
    ];

    fn includes(self, exercise: &Exercise) -> bool {
        match self {
            Category::Push => exercise.pattern == MovementPattern::Push,
            Category::Pull => exercise.pattern == MovementPattern::Pull,
            Category::Legs => exercise.pattern == MovementPattern::Legs,
            Category::Core => exercise.pattern == MovementPattern::Core,
            Category::Skills => {
                exercise.skill.is_some() || exercise.pattern == MovementPattern::SkillFullBody
            }
        }
    }
}

/// Compute the composite readiness score as of `reference_date`.
///
/// A brand-new user with an empty history scores exactly 0: the consistency
/// bonus is only granted once at least one category has a nonzero base.
pub fn score(
    catalog: &Catalog,
    history: &ExerciseHistory,
    reference_date: NaiveDate,
) -> ReadinessScore {
    let mastered = mastered_set(catalog, history);

    let mut breakdown = ReadinessBreakdown::default();
    let mut weighted_sum = 0.0;

    for category in Category::ALL {
        let members: Vec<&Exercise> =
            catalog.iter().filter(|ex| category.includes(ex)).collect();

        let raw = category_score(&members, &mastered, history);
        let rounded = raw.round() as u32;
        match category {
            Category::Push => breakdown.push = rounded,
            Category::Pull => breakdown.pull = rounded,
            Category::Legs => breakdown.legs = rounded,
            Category::Core => breakdown.core = rounded,
            Category::Skills => breakdown.skills = rounded,
        }
        weighted_sum += raw * CATEGORY_WEIGHT;
    }

    // Phantom-bonus guard: merely showing up earns nothing until something
    // has actually been mastered.
    let bonus = if weighted_sum > 0.0 {
        consistency_bonus(history, reference_date)
    } else {
        0
    };

    let total = (weighted_sum + f64::from(bonus)).clamp(0.0, 100.0).round() as u32;

    ReadinessScore {
        total_score: total,
        breakdown,
    }
}

/// Proficiency base x effort penalty for one category, unrounded.
fn category_score(
    members: &[&Exercise],
    mastered: &HashSet<String>,
    history: &ExerciseHistory,
) -> f64 {
    let max_possible = members
        .iter()
        .map(|ex| ex.difficulty_score)
        .max()
        .unwrap_or(0);
    if max_possible <= 0 {
        return 0.0;
    }

    let max_mastered = members
        .iter()
        .filter(|ex| mastered.contains(&ex.id))
        .map(|ex| ex.difficulty_score)
        .max()
        .unwrap_or(0)
        .max(0);

    let base = 100.0 * f64::from(max_mastered) / f64::from(max_possible);
    base * effort_penalty(members, history)
}

/// Fatigue penalty from the category's most recent sessions.
///
/// Averages RPE over up to the three most-recent-by-date sessions across
/// all member exercises; at or above the threshold the category is treated
/// as overreached.
fn effort_penalty(members: &[&Exercise], history: &ExerciseHistory) -> f64 {
    let mut sessions: Vec<&Session> = members
        .iter()
        .flat_map(|ex| history.sessions_for(&ex.id))
        .collect();
    if sessions.is_empty() {
        return 1.0;
    }

    // Stable sort keeps catalog/log order among same-day sessions
    sessions.sort_by(|a, b| b.date.cmp(&a.date));
    let recent = &sessions[..sessions.len().min(PENALTY_WINDOW)];

    let avg_rpe =
        recent.iter().map(|s| f64::from(s.rpe)).sum::<f64>() / recent.len() as f64;

    if avg_rpe >= PENALTY_RPE_THRESHOLD {
        PENALTY_FACTOR
    } else {
        1.0
    }
}

/// Distinct training days in the trailing week, worth 2 points each, capped.
fn consistency_bonus(history: &ExerciseHistory, reference_date: NaiveDate) -> u32 {
    let window_start = reference_date - Duration::days(CONSISTENCY_WINDOW_DAYS);

    let days: HashSet<NaiveDate> = history
        .iter()
        .flat_map(|(_, sessions)| sessions.iter())
        .map(|s| s.date)
        .filter(|d| *d >= window_start && *d <= reference_date)
        .collect();

    (days.len() as u32 * CONSISTENCY_POINTS_PER_DAY).min(CONSISTENCY_BONUS_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    fn session(date: NaiveDate, value: u32, rpe: u8) -> Session {
        Session {
            date,
            performed_value: value,
            rpe,
            goal_met: true,
        }
    }

    fn master(history: &mut ExerciseHistory, id: &str, value: u32) {
        history.push(id, session(day(1), value, 2));
        history.push(id, session(day(2), value, 2));
    }

    #[test]
    fn test_empty_history_scores_zero() {
        let catalog = build_default_catalog();
        let result = score(&catalog, &ExerciseHistory::new(), day(20));

        assert_eq!(result.total_score, 0);
        assert_eq!(result.breakdown, ReadinessBreakdown::default());
    }

    #[test]
    fn test_no_phantom_bonus_for_unmastered_activity() {
        // Sessions exist inside the bonus window but nothing is mastered:
        // score must stay exactly 0.
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        history.push("push_up", session(day(19), 3, 4));
        history.push("push_up", session(day(20), 4, 4));

        let result = score(&catalog, &history, day(20));
        assert_eq!(result.total_score, 0);
    }

    #[test]
    fn test_category_independence() {
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        master(&mut history, "push_up", 15);

        let result = score(&catalog, &history, day(20));
        assert!(result.breakdown.push > 0);
        assert_eq!(result.breakdown.pull, 0);
        assert_eq!(result.breakdown.legs, 0);
        assert_eq!(result.breakdown.skills, 0);
    }

    #[test]
    fn test_base_score_is_ratio_of_max_difficulty() {
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        // push_up has difficulty 2; the push ceiling is 5 (pseudo planche)
        master(&mut history, "push_up", 15);

        let result = score(&catalog, &history, day(20));
        assert_eq!(result.breakdown.push, 40);
    }

    #[test]
    fn test_high_rpe_recent_sessions_penalize_category() {
        let catalog = build_default_catalog();

        let mut fresh = ExerciseHistory::new();
        master(&mut fresh, "push_up", 15);

        let mut cooked = ExerciseHistory::new();
        master(&mut cooked, "push_up", 15);
        // Three grinding sessions on top of the mastery ones
        cooked.push("pike_push_up", session(day(10), 5, 5));
        cooked.push("pike_push_up", session(day(11), 5, 4));
        cooked.push("incline_push_up", session(day(12), 8, 4));

        let fresh_score = score(&catalog, &fresh, day(20));
        let cooked_score = score(&catalog, &cooked, day(20));
        assert!(cooked_score.breakdown.push < fresh_score.breakdown.push);
        assert_eq!(cooked_score.breakdown.push, 36); // 40 * 0.9
    }

    #[test]
    fn test_penalty_uses_only_three_most_recent() {
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        master(&mut history, "push_up", 15);
        // Old max-effort grinds, then three recent easy sessions
        history.push("push_up", session(day(5), 15, 5));
        history.push("push_up", session(day(6), 15, 5));
        history.push("push_up", session(day(10), 15, 2));
        history.push("push_up", session(day(11), 15, 2));
        history.push("push_up", session(day(12), 15, 2));

        let result = score(&catalog, &history, day(20));
        assert_eq!(result.breakdown.push, 40); // no penalty
    }

    #[test]
    fn test_consistency_bonus_window_boundary() {
        // Sessions 3, 5, and 9 days before the reference date: the 9-day-old
        // one is outside the window, so the bonus is 2 days x 2 points = 4.
        let catalog = build_default_catalog();
        let reference = day(20);
        let mut history = ExerciseHistory::new();
        master(&mut history, "push_up", 15);

        // The mastery fixture dates (day 1 and 2) are also outside the window
        history.push("bodyweight_squat", session(day(17), 10, 2)); // 3 days ago
        history.push("bodyweight_squat", session(day(15), 10, 2)); // 5 days ago
        history.push("bodyweight_squat", session(day(11), 10, 2)); // 9 days ago

        let without_bonus = {
            let mut h = ExerciseHistory::new();
            master(&mut h, "push_up", 15);
            score(&catalog, &h, reference).total_score
        };
        let with_bonus = score(&catalog, &history, reference).total_score;

        assert_eq!(with_bonus, without_bonus + 4);
    }

    #[test]
    fn test_bonus_capped_at_ten() {
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        master(&mut history, "push_up", 15);
        for n in 14..=20 {
            history.push("bodyweight_squat", session(day(n), 10, 2));
        }

        // 7 distinct days -> 14 raw points, capped at 10
        assert_eq!(consistency_bonus(&history, day(20)), 10);
    }

    #[test]
    fn test_skill_tagged_exercises_feed_skills_category() {
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        // l_sit_tuck is pattern core AND skill-tagged: contributes to both
        master(&mut history, "l_sit_tuck", 20);

        let result = score(&catalog, &history, day(20));
        assert!(result.breakdown.skills > 0);
        assert!(result.breakdown.core > 0);
    }

    #[test]
    fn test_total_clamped_to_hundred() {
        let catalog = build_default_catalog();
        let mut history = ExerciseHistory::new();
        for ex in catalog.iter() {
            let target = ex.mastery_target().unwrap();
            history.push(ex.id.clone(), session(day(19), target, 2));
            history.push(ex.id.clone(), session(day(20), target, 2));
        }

        let result = score(&catalog, &history, day(20));
        assert_eq!(result.total_score, 100);
    }
}
