//! Storage layer for the study planner.
//!
//! Provides persistence for commitments, assignments, the work-hours
//! preference and the generated master schedule using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` instance can be moved between threads but cannot be shared
//! across threads without external synchronization.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! Assignment deadlines and session bounds are local wall-clock times stored as
//! TEXT in `YYYY-MM-DDTHH:MM:SS` form; dates as `YYYY-MM-DD`. Lexicographic
//! ordering matches chronological ordering.
//!
//! ## Fixed Tasks
//!
//! Fixed tasks are stored exactly as entered (clock strings plus AM/PM flags,
//! weekday abbreviations comma-joined). Normalization happens when a master
//! schedule is loaded, so a malformed row never makes the table unreadable.
//!
//! ## Work Sessions
//!
//! `work_sessions` only ever holds the output of the latest scheduling run.
//! [`Database::save_master_schedule`] replaces the whole table in one
//! transaction.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use planner_core::{
    Assignment, AssignmentId, AssignmentOrigin, FixedTask, FixedTaskRecord, MasterSchedule,
    SessionId, TaskId, WorkHours, WorkSession,
};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

const PREF_WORK_START: &str = "work_hours.start";
const PREF_WORK_END: &str = "work_hours.end";
const PREF_GENERATED_AT: &str = "schedule.generated_at";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp or date.
    #[error("invalid timestamp for {id}: {value}")]
    TimestampParse {
        id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// A stored row violates a domain invariant.
    #[error("invalid {table} record {id}: {message}")]
    InvalidRecord {
        table: &'static str,
        id: String,
        message: String,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- User-entered commitments, stored as entered
            -- days_of_week: comma-joined abbreviations (e.g., 'M,W,F')
            CREATE TABLE IF NOT EXISTS fixed_tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                start_time TEXT,
                end_time TEXT,
                am_start INTEGER,
                am_end INTEGER,
                start_date TEXT,
                days_of_week TEXT
            );

            -- Deadlines from the course feed or entered manually
            -- due_at: local time 'YYYY-MM-DDTHH:MM:SS'
            CREATE TABLE IF NOT EXISTS assignments (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                due_at TEXT NOT NULL,
                origin TEXT NOT NULL DEFAULT 'imported'
            );

            CREATE INDEX IF NOT EXISTS idx_assignments_due ON assignments(due_at);

            -- Output of the latest scheduling run, in placement order
            CREATE TABLE IF NOT EXISTS work_sessions (
                id TEXT PRIMARY KEY,
                assignment_id TEXT NOT NULL,
                title TEXT NOT NULL,
                start_at TEXT NOT NULL,
                end_at TEXT NOT NULL,
                date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_work_sessions_date ON work_sessions(date);
            CREATE INDEX IF NOT EXISTS idx_work_sessions_assignment ON work_sessions(assignment_id);

            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // ========== Fixed Tasks ==========

    /// Inserts a fixed task, replacing any task with the same ID.
    pub fn insert_fixed_task(&mut self, task: &FixedTaskRecord) -> Result<(), DbError> {
        let days = task.days_of_week.as_ref().map(|d| d.join(","));
        self.conn.execute(
            "
            INSERT OR REPLACE INTO fixed_tasks
            (id, title, start_time, end_time, am_start, am_end, start_date, days_of_week)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                task.id.as_str(),
                task.title,
                task.start_time,
                task.end_time,
                task.am_start,
                task.am_end,
                task.start_date,
                days,
            ],
        )?;
        Ok(())
    }

    /// Lists fixed tasks in insertion order.
    pub fn list_fixed_tasks(&self) -> Result<Vec<FixedTaskRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, title, start_time, end_time, am_start, am_end, start_date, days_of_week
            FROM fixed_tasks
            ORDER BY rowid ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<bool>>(4)?,
                row.get::<_, Option<bool>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            let (id, title, start_time, end_time, am_start, am_end, start_date, days) = row?;
            let id = TaskId::new(&id).map_err(|e| invalid("fixed_tasks", &id, e))?;
            tasks.push(FixedTaskRecord {
                id,
                title,
                start_time,
                end_time,
                am_start,
                am_end,
                start_date,
                days_of_week: days.map(|d| split_days(&d)),
            });
        }
        Ok(tasks)
    }

    /// Deletes a fixed task. Returns whether a row was removed.
    pub fn delete_fixed_task(&mut self, id: &str) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM fixed_tasks WHERE id = ?", [id])?;
        Ok(deleted > 0)
    }

    // ========== Assignments ==========

    /// Inserts or updates assignments by ID.
    pub fn upsert_assignments(&mut self, assignments: &[Assignment]) -> Result<usize, DbError> {
        if assignments.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let written = insert_assignments(&tx, assignments)?;
        tx.commit()?;
        Ok(written)
    }

    /// Replaces every imported assignment with `assignments`.
    ///
    /// Manually entered assignments are kept unless an incoming assignment
    /// reuses their ID. Stored sessions of assignments that dropped out of
    /// the feed are removed.
    pub fn replace_assignments(&mut self, assignments: &[Assignment]) -> Result<usize, DbError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM assignments WHERE origin = ?",
            [AssignmentOrigin::Imported.as_str()],
        )?;
        let written = insert_assignments(&tx, assignments)?;
        let orphaned = tx.execute(
            "DELETE FROM work_sessions WHERE assignment_id NOT IN (SELECT id FROM assignments)",
            [],
        )?;
        tx.commit()?;
        tracing::debug!(removed, written, orphaned, "replaced imported assignments");
        Ok(written)
    }

    /// Lists assignments by due date, then ID.
    pub fn list_assignments(&self) -> Result<Vec<Assignment>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, title, due_at, origin
            FROM assignments
            ORDER BY due_at ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut assignments = Vec::new();
        for row in rows {
            let (id, title, due_at, origin) = row?;
            let due_at = parse_timestamp(&due_at, &id)?;
            let origin = origin
                .parse::<AssignmentOrigin>()
                .map_err(|e| invalid("assignments", &id, e))?;
            let id = AssignmentId::new(&id).map_err(|e| invalid("assignments", &id, e))?;
            assignments.push(Assignment {
                id,
                title,
                due_at,
                origin,
            });
        }
        Ok(assignments)
    }

    /// Deletes an assignment and any sessions generated for it.
    pub fn delete_assignment(&mut self, id: &str) -> Result<bool, DbError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM assignments WHERE id = ?", [id])?;
        tx.execute("DELETE FROM work_sessions WHERE assignment_id = ?", [id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    // ========== Preferences ==========

    /// Stores the work-hours preference.
    pub fn set_work_hours(&mut self, hours: &WorkHours) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        set_preference(&tx, PREF_WORK_START, &hours.start().to_string())?;
        set_preference(&tx, PREF_WORK_END, &hours.end().to_string())?;
        tx.commit()?;
        Ok(())
    }

    /// Returns the stored work-hours preference, if set.
    pub fn work_hours(&self) -> Result<Option<WorkHours>, DbError> {
        let start = self.preference(PREF_WORK_START)?;
        let end = self.preference(PREF_WORK_END)?;
        let (Some(start), Some(end)) = (start, end) else {
            return Ok(None);
        };
        WorkHours::parse(&start, &end)
            .map(Some)
            .map_err(|e| invalid("preferences", "work_hours", e))
    }

    fn preference(&self, key: &str) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row("SELECT value FROM preferences WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    // ========== Master Schedule ==========

    /// Replaces the stored work sessions with the schedule's and records when
    /// it was generated.
    ///
    /// Fixed tasks and assignments are owned by their own tables and are not
    /// rewritten here.
    pub fn save_master_schedule(&mut self, schedule: &MasterSchedule) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM work_sessions", [])?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO work_sessions (id, assignment_id, title, start_at, end_at, date)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )?;
            for session in &schedule.work_sessions {
                stmt.execute(params![
                    session.id.as_str(),
                    session.assignment_id.as_str(),
                    session.title,
                    format_timestamp(session.start),
                    format_timestamp(session.end),
                    session.date.format(DATE_FORMAT).to_string(),
                ])?;
            }
        }
        set_preference(&tx, PREF_GENERATED_AT, &format_timestamp(schedule.generated_at))?;
        tx.commit()?;
        tracing::debug!(
            sessions = schedule.work_sessions.len(),
            "saved master schedule"
        );
        Ok(())
    }

    /// Loads the master schedule, or `None` if none has been generated.
    pub fn load_master_schedule(&self) -> Result<Option<MasterSchedule>, DbError> {
        let Some(generated_at) = self.preference(PREF_GENERATED_AT)? else {
            return Ok(None);
        };
        let generated_at = parse_timestamp(&generated_at, PREF_GENERATED_AT)?;

        let fixed_tasks = self
            .list_fixed_tasks()?
            .iter()
            .map(FixedTask::from_record)
            .collect();

        Ok(Some(MasterSchedule {
            fixed_tasks,
            assignments: self.list_assignments()?,
            work_sessions: self.list_work_sessions()?,
            generated_at,
        }))
    }

    /// Removes generated sessions and the generation timestamp.
    pub fn clear_master_schedule(&mut self) -> Result<(), DbError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM work_sessions", [])?;
        tx.execute("DELETE FROM preferences WHERE key = ?", [PREF_GENERATED_AT])?;
        tx.commit()?;
        Ok(())
    }

    /// Lists stored work sessions in placement order.
    pub fn list_work_sessions(&self) -> Result<Vec<WorkSession>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, assignment_id, title, start_at, end_at, date
            FROM work_sessions
            ORDER BY rowid ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, assignment_id, title, start_at, end_at, date) = row?;
            let start = parse_timestamp(&start_at, &id)?;
            let end = parse_timestamp(&end_at, &id)?;
            let date = parse_date(&date, &id)?;
            let assignment_id =
                AssignmentId::new(assignment_id).map_err(|e| invalid("work_sessions", &id, e))?;
            let id = SessionId::new(&id).map_err(|e| invalid("work_sessions", &id, e))?;
            sessions.push(WorkSession {
                id,
                assignment_id,
                title,
                start,
                end,
                date,
                generated: true,
            });
        }
        Ok(sessions)
    }
}

fn insert_assignments(conn: &Connection, assignments: &[Assignment]) -> Result<usize, DbError> {
    let mut stmt = conn.prepare(
        "
        INSERT INTO assignments (id, title, due_at, origin)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            due_at = excluded.due_at,
            origin = excluded.origin
        ",
    )?;
    let mut written = 0;
    for assignment in assignments {
        written += stmt.execute(params![
            assignment.id.as_str(),
            assignment.title,
            format_timestamp(assignment.due_at),
            assignment.origin.as_str(),
        ])?;
    }
    Ok(written)
}

fn set_preference(conn: &Connection, key: &str, value: &str) -> Result<(), DbError> {
    conn.execute(
        "INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)",
        params![key, value],
    )?;
    Ok(())
}

fn split_days(days: &str) -> Vec<String> {
    days.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect()
}

fn invalid(table: &'static str, id: &str, err: impl std::fmt::Display) -> DbError {
    DbError::InvalidRecord {
        table,
        id: id.to_string(),
        message: err.to_string(),
    }
}

fn parse_timestamp(value: &str, id: &str) -> Result<NaiveDateTime, DbError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        DbError::TimestampParse {
            id: id.to_string(),
            value: value.to_string(),
            source,
        }
    })
}

fn parse_date(value: &str, id: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| DbError::TimestampParse {
        id: id.to_string(),
        value: value.to_string(),
        source,
    })
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
