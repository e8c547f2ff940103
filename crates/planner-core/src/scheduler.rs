//! Work-session allocation.
//!
//! Places one-hour work sessions for upcoming assignments around the user's
//! fixed commitments.
//!
//! # Algorithm Summary
//!
//! 1. Drop assignments already past due; order the rest earliest deadline
//!    first (stable, so equal deadlines keep input order)
//! 2. For each assignment, make up to [`SESSIONS_PER_ASSIGNMENT`] attempts:
//!    pick the least-loaded day between today and the due date, then scan
//!    hourly from the work-window start (shifted by that day's load) for the
//!    first slot clear of fixed tasks and earlier sessions
//! 3. An attempt that finds no free slot is dropped and its day is taken out
//!    of the candidates for the rest of the run; the assignment gets fewer
//!    sessions only when every day up to its deadline is full

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::assignment::Assignment;
use crate::clock::{ClockTime, TimeRange};
use crate::commitment::FixedTask;
use crate::day_load::DayLoadTracker;
use crate::free_slot::{commitments_on, is_slot_free, sessions_on};
use crate::types::SessionId;
use crate::work_hours::WorkHours;
use crate::work_session::WorkSession;

/// Most sessions a single assignment receives in one run.
pub const SESSIONS_PER_ASSIGNMENT: usize = 3;

/// Length of every work session.
pub const SESSION_MINUTES: u32 = 60;

/// Scheduler errors.
///
/// Running out of room is not an error; it just yields fewer sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The caller did not supply a work-hours preference.
    #[error("work hours not set")]
    MissingWorkHours,

    /// The day-load tracker was asked to rank an empty candidate set.
    #[error("no candidate days to schedule on")]
    NoCandidateDays,
}

/// Configuration for session allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Latest time any session may end, regardless of the work window.
    /// The effective bound is the earlier of this and the window end.
    /// Default: 20:00.
    pub latest_end: ClockTime,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            latest_end: ClockTime::at_hour(20),
        }
    }
}

/// Source of identifiers for newly created sessions.
pub trait SessionIdGenerator {
    fn next_id(&mut self) -> SessionId;
}

/// Random UUID v4 session IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSessionIds;

impl SessionIdGenerator for UuidSessionIds {
    fn next_id(&mut self) -> SessionId {
        SessionId::generate()
    }
}

/// Deterministic `{prefix}-{n}` session IDs, counting from 1.
#[derive(Debug, Clone)]
pub struct SequentialSessionIds {
    prefix: String,
    next: u64,
}

impl SequentialSessionIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl SessionIdGenerator for SequentialSessionIds {
    fn next_id(&mut self) -> SessionId {
        let id = SessionId::sequential(&self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Allocate work sessions for upcoming assignments.
///
/// # Arguments
///
/// * `fixed_tasks` - Normalized user commitments; unscheduled or untimed ones are ignored
/// * `assignments` - Deadlines in feed order
/// * `work_hours` - Daily window; `None` fails with [`ScheduleError::MissingWorkHours`]
/// * `now` - Reference time; assignments due before it are skipped
/// * `config` - Allocation configuration
/// * `ids` - Source of fresh session IDs
///
/// # Returns
///
/// The new sessions in the order they were placed. They replace any
/// sessions from an earlier run.
pub fn allocate_sessions<G: SessionIdGenerator + ?Sized>(
    fixed_tasks: &[FixedTask],
    assignments: &[Assignment],
    work_hours: Option<&WorkHours>,
    now: NaiveDateTime,
    config: &SchedulerConfig,
    ids: &mut G,
) -> Result<Vec<WorkSession>, ScheduleError> {
    let work_hours = work_hours.ok_or(ScheduleError::MissingWorkHours)?;
    let end_bound = work_hours.end().min(config.latest_end);
    let today = now.date();

    let mut upcoming: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| {
            let keep = a.is_upcoming(now);
            if !keep {
                tracing::debug!(assignment = %a.id, due_at = %a.due_at, "skipping past-due assignment");
            }
            keep
        })
        .collect();
    upcoming.sort_by_key(|a| a.due_at);

    let mut tracker = DayLoadTracker::new();
    let mut sessions: Vec<WorkSession> = Vec::new();
    // Days whose scan came up empty. Loads only grow, so they stay full.
    let mut exhausted: HashSet<NaiveDate> = HashSet::new();

    for assignment in upcoming {
        let mut candidate_days: Vec<NaiveDate> = days_through(today, assignment.due_at.date())
            .into_iter()
            .filter(|d| !exhausted.contains(d))
            .collect();
        let mut placed = 0;

        for attempt in 1..=SESSIONS_PER_ASSIGNMENT {
            if candidate_days.is_empty() {
                break;
            }
            let day = tracker.least_loaded_day(&candidate_days)?;
            let Some(slot) = find_free_slot(
                day,
                tracker.load(day),
                work_hours.start(),
                end_bound,
                fixed_tasks,
                &sessions,
            ) else {
                tracing::debug!(
                    assignment = %assignment.id,
                    attempt,
                    %day,
                    "no free slot, dropping attempt"
                );
                exhausted.insert(day);
                candidate_days.retain(|d| *d != day);
                continue;
            };

            let session = WorkSession::new(ids.next_id(), assignment, day, slot);
            tracing::debug!(
                assignment = %assignment.id,
                session = %session.id,
                %day,
                %slot,
                "placed work session"
            );
            sessions.push(session);
            tracker.increment(day);
            placed += 1;
        }

        if placed < SESSIONS_PER_ASSIGNMENT {
            tracing::info!(
                assignment = %assignment.id,
                placed,
                "could not fit all work sessions before the deadline"
            );
        }
    }

    tracing::info!(
        sessions = sessions.len(),
        assignments = assignments.len(),
        "work sessions allocated"
    );
    Ok(sessions)
}

/// Every date from `first` through `last`, inclusive. Empty when `last < first`.
fn days_through(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|d| *d <= last).collect()
}

/// First free one-hour slot on `day`, scanning hourly from the window start
/// shifted by `load` hours. The slot must end by `end_bound`.
fn find_free_slot(
    day: NaiveDate,
    load: u32,
    window_start: ClockTime,
    end_bound: ClockTime,
    fixed_tasks: &[FixedTask],
    sessions: &[WorkSession],
) -> Option<TimeRange> {
    let fixed_on_day = commitments_on(day, fixed_tasks);
    let placed_on_day = sessions_on(day, sessions);
    let bound = u32::from(end_bound.minutes());

    let mut start = u32::from(window_start.minutes()) + load * SESSION_MINUTES;
    while start + SESSION_MINUTES <= bound {
        let slot = TimeRange::from_minutes(start, start + SESSION_MINUTES)?;
        if is_slot_free(&slot, &fixed_on_day, &placed_on_day) {
            return Some(slot);
        }
        start += SESSION_MINUTES;
    }
    None
}
