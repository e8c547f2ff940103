//! Generated work sessions.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::clock::{ClockTime, TimeRange};
use crate::types::{AssignmentId, SessionId};

/// A one-hour block the scheduler placed for an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: SessionId,
    pub assignment_id: AssignmentId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// The single calendar day the session occupies.
    pub date: NaiveDate,
    /// Always `true`; distinguishes sessions from user-entered tasks.
    pub generated: bool,
}

impl WorkSession {
    /// Builds the session for `assignment` occupying `slot` on `date`.
    pub fn new(id: SessionId, assignment: &Assignment, date: NaiveDate, slot: TimeRange) -> Self {
        Self {
            id,
            assignment_id: assignment.id.clone(),
            title: format!("Work on {}", assignment.title),
            start: date.and_time(slot.start().to_naive_time()),
            end: date.and_time(slot.end().to_naive_time()),
            date,
            generated: true,
        }
    }

    /// The session's span as minutes of its day.
    pub fn time_range(&self) -> Option<TimeRange> {
        TimeRange::new(
            ClockTime::from(self.start.time()),
            ClockTime::from(self.end.time()),
        )
    }
}
