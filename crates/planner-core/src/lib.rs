//! Core domain logic for the study planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Commitments: fixed tasks and assignments, normalized at the record boundary
//! - Scheduling: placing one-hour work sessions around commitments
//! - Snapshots: bundling a run's output into the master schedule and agenda views

pub mod agenda;
mod assignment;
pub mod clock;
pub mod commitment;
mod day_load;
pub mod free_slot;
mod scheduler;
pub mod snapshot;
pub mod types;
mod work_hours;
mod work_session;

pub use agenda::{AgendaItem, AgendaKind, agenda_for};
pub use assignment::Assignment;
pub use clock::{ClockParseError, ClockTime, TimeRange};
pub use commitment::{FixedTask, FixedTaskRecord, Occurrence, WeekdaySet};
pub use day_load::DayLoadTracker;
pub use scheduler::{
    SESSION_MINUTES, SESSIONS_PER_ASSIGNMENT, ScheduleError, SchedulerConfig, SequentialSessionIds,
    SessionIdGenerator, UuidSessionIds, allocate_sessions,
};
pub use snapshot::{AssignmentCoverage, MasterSchedule, generate_master_schedule};
pub use types::{AssignmentId, AssignmentOrigin, SessionId, TaskId, ValidationError};
pub use work_hours::{WorkHours, WorkHoursError};
pub use work_session::WorkSession;
