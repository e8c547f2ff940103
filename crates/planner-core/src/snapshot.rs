//! The master schedule: commitments, deadlines and generated sessions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::commitment::{FixedTask, FixedTaskRecord};
use crate::scheduler::{
    SESSIONS_PER_ASSIGNMENT, ScheduleError, SchedulerConfig, SessionIdGenerator, allocate_sessions,
};
use crate::types::AssignmentId;
use crate::work_hours::WorkHours;
use crate::work_session::WorkSession;

/// Everything the planner displays, stored together.
///
/// `work_sessions` is always the output of a single run and replaces the
/// previous run's sessions wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSchedule {
    pub fixed_tasks: Vec<FixedTask>,
    pub assignments: Vec<Assignment>,
    pub work_sessions: Vec<WorkSession>,
    /// The `now` the sessions were computed against.
    pub generated_at: NaiveDateTime,
}

/// How many sessions an assignment received in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentCoverage {
    pub assignment_id: AssignmentId,
    pub title: String,
    pub due_at: NaiveDateTime,
    pub sessions: usize,
}

impl AssignmentCoverage {
    /// Whether the run could not fit the full number of sessions.
    pub const fn is_short(&self) -> bool {
        self.sessions < SESSIONS_PER_ASSIGNMENT
    }
}

impl MasterSchedule {
    /// Sessions generated for one assignment.
    pub fn sessions_for<'a>(
        &'a self,
        assignment_id: &'a AssignmentId,
    ) -> impl Iterator<Item = &'a WorkSession> + 'a {
        self.work_sessions
            .iter()
            .filter(move |s| &s.assignment_id == assignment_id)
    }

    /// Per-assignment session counts for assignments that were still upcoming
    /// when the schedule was generated, earliest deadline first.
    pub fn coverage(&self) -> Vec<AssignmentCoverage> {
        let mut upcoming: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.is_upcoming(self.generated_at))
            .collect();
        upcoming.sort_by_key(|a| a.due_at);

        upcoming
            .into_iter()
            .map(|a| AssignmentCoverage {
                assignment_id: a.id.clone(),
                title: a.title.clone(),
                due_at: a.due_at,
                sessions: self.sessions_for(&a.id).count(),
            })
            .collect()
    }
}

/// Normalize commitments, allocate sessions and bundle the result.
pub fn generate_master_schedule<G: SessionIdGenerator + ?Sized>(
    records: &[FixedTaskRecord],
    assignments: Vec<Assignment>,
    work_hours: Option<&WorkHours>,
    now: NaiveDateTime,
    config: &SchedulerConfig,
    ids: &mut G,
) -> Result<MasterSchedule, ScheduleError> {
    let fixed_tasks: Vec<FixedTask> = records.iter().map(FixedTask::from_record).collect();
    let work_sessions =
        allocate_sessions(&fixed_tasks, &assignments, work_hours, now, config, ids)?;

    Ok(MasterSchedule {
        fixed_tasks,
        assignments,
        work_sessions,
        generated_at: now,
    })
}
