//! Conflict checks for a candidate slot on one day.

use chrono::NaiveDate;

use crate::clock::TimeRange;
use crate::commitment::FixedTask;
use crate::work_session::WorkSession;

/// Fixed tasks that block time on `day`.
///
/// Tasks that are unscheduled or not time-bound are left out.
pub fn commitments_on(day: NaiveDate, tasks: &[FixedTask]) -> Vec<&FixedTask> {
    tasks.iter().filter(|task| task.blocks(day)).collect()
}

/// Sessions already committed on `day`.
pub fn sessions_on(day: NaiveDate, sessions: &[WorkSession]) -> Vec<&WorkSession> {
    sessions.iter().filter(|s| s.date == day).collect()
}

/// Whether `slot` intersects none of the given same-day tasks and sessions.
///
/// Both lists must already be narrowed to the slot's day.
pub fn is_slot_free(slot: &TimeRange, fixed: &[&FixedTask], placed: &[&WorkSession]) -> bool {
    let task_conflict = fixed
        .iter()
        .filter_map(|task| task.time_range)
        .any(|range| range.overlaps(slot));
    if task_conflict {
        return false;
    }

    !placed
        .iter()
        .filter_map(|session| session.time_range())
        .any(|range| range.overlaps(slot))
}
