//! History normalization from stored workout records.
//!
//! Stored records are permissive: effort and goal feedback can live at the
//! workout level, at the exercise level, or be missing entirely. This
//! module resolves all of that exactly once into `ExerciseHistory`, so the
//! engine downstream never sees an Option.

use crate::types::{Catalog, ExerciseHistory, Session, WorkoutRecord, WorkoutStatus};
use chrono::NaiveDate;
use std::collections::HashSet;

/// RPE assumed when a record carries no effort feedback at any level
const DEFAULT_RPE: u8 = 3;

/// Build a normalized history from stored workout records.
///
/// Only completed workouts dated at or before `as_of` contribute. For each
/// logged exercise:
/// - performed value falls back to the prescribed value, then 0,
/// - rpe: exercise-level, else workout-level, else 3,
/// - goal_met: exercise-level, else workout-level, else true.
///
/// Exercise ids missing from the catalog are kept (they still count toward
/// training-day frequency) but warned about once each.
pub fn build_history(
    catalog: &Catalog,
    records: &[WorkoutRecord],
    as_of: NaiveDate,
) -> ExerciseHistory {
    let mut history = ExerciseHistory::new();
    let mut warned: HashSet<&str> = HashSet::new();

    for record in records {
        if record.status != WorkoutStatus::Completed {
            continue;
        }
        if record.date > as_of {
            continue;
        }

        let workout_rpe = record.rpe.unwrap_or(DEFAULT_RPE);
        let workout_goal = record.goal_met.unwrap_or(true);

        for logged in &record.exercises {
            if !catalog.contains(&logged.exercise_id)
                && warned.insert(logged.exercise_id.as_str())
            {
                tracing::warn!(
                    "Workout {} references unknown exercise '{}'",
                    record.id,
                    logged.exercise_id
                );
            }

            let session = Session {
                date: record.date,
                performed_value: logged
                    .performed_value
                    .or(logged.prescribed_value)
                    .unwrap_or(0),
                rpe: logged.rpe.unwrap_or(workout_rpe),
                goal_met: logged.goal_met.unwrap_or(workout_goal),
            };
            history.push(logged.exercise_id.clone(), session);
        }
    }

    tracing::debug!(
        "Normalized {} workout records into history ({} exercises)",
        records.len(),
        history.iter().count()
    );
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::types::LoggedExercise;
    use uuid::Uuid;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    fn logged(id: &str) -> LoggedExercise {
        LoggedExercise {
            exercise_id: id.into(),
            performed_value: None,
            prescribed_value: None,
            rpe: None,
            goal_met: None,
        }
    }

    fn record(date: NaiveDate, status: WorkoutStatus, exercises: Vec<LoggedExercise>) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            date,
            status,
            rpe: None,
            goal_met: None,
            exercises,
        }
    }

    #[test]
    fn test_defaults_resolved_once() {
        let catalog = build_default_catalog();
        let records = vec![record(
            day(1),
            WorkoutStatus::Completed,
            vec![logged("push_up")],
        )];

        let history = build_history(&catalog, &records, day(10));
        let sessions = history.sessions_for("push_up");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].performed_value, 0);
        assert_eq!(sessions[0].rpe, 3);
        assert!(sessions[0].goal_met);
    }

    #[test]
    fn test_performed_falls_back_to_prescribed() {
        let catalog = build_default_catalog();
        let mut ex = logged("push_up");
        ex.prescribed_value = Some(12);
        let records = vec![record(day(1), WorkoutStatus::Completed, vec![ex])];

        let history = build_history(&catalog, &records, day(10));
        assert_eq!(history.sessions_for("push_up")[0].performed_value, 12);
    }

    #[test]
    fn test_exercise_level_overrides_workout_level() {
        let catalog = build_default_catalog();
        let mut plain = logged("push_up");
        plain.rpe = None; // inherits workout rpe
        let mut overridden = logged("plank");
        overridden.rpe = Some(5);
        overridden.goal_met = Some(false);

        let mut rec = record(day(1), WorkoutStatus::Completed, vec![plain, overridden]);
        rec.rpe = Some(2);
        rec.goal_met = Some(true);

        let history = build_history(&catalog, &[rec], day(10));
        assert_eq!(history.sessions_for("push_up")[0].rpe, 2);
        assert!(history.sessions_for("push_up")[0].goal_met);
        assert_eq!(history.sessions_for("plank")[0].rpe, 5);
        assert!(!history.sessions_for("plank")[0].goal_met);
    }

    #[test]
    fn test_pending_and_skipped_records_ignored() {
        let catalog = build_default_catalog();
        let records = vec![
            record(day(1), WorkoutStatus::Pending, vec![logged("push_up")]),
            record(day(2), WorkoutStatus::Skipped, vec![logged("push_up")]),
        ];

        let history = build_history(&catalog, &records, day(10));
        assert!(history.is_empty());
    }

    #[test]
    fn test_records_after_as_of_excluded() {
        let catalog = build_default_catalog();
        let records = vec![
            record(day(5), WorkoutStatus::Completed, vec![logged("push_up")]),
            record(day(15), WorkoutStatus::Completed, vec![logged("push_up")]),
        ];

        let history = build_history(&catalog, &records, day(10));
        assert_eq!(history.sessions_for("push_up").len(), 1);
        assert_eq!(history.sessions_for("push_up")[0].date, day(5));
    }

    #[test]
    fn test_unknown_exercise_kept_for_frequency() {
        let catalog = build_default_catalog();
        let records = vec![record(
            day(1),
            WorkoutStatus::Completed,
            vec![logged("retired_exercise")],
        )];

        let history = build_history(&catalog, &records, day(10));
        assert_eq!(history.sessions_for("retired_exercise").len(), 1);
        assert_eq!(history.distinct_dates_desc(), vec![day(1)]);
    }
}
