//! Schedule command: regenerate work sessions and store the master schedule.
//!
//! Reads commitments, assignments and the work window from the database,
//! runs the allocator against `now`, replaces the stored sessions and
//! prints the result. Assignments that did not receive the full number of
//! sessions are called out after the schedule.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use planner_core::{
    SESSIONS_PER_ASSIGNMENT, ScheduleError, SchedulerConfig, SessionIdGenerator,
    generate_master_schedule,
};
use planner_db::Database;

use super::show::{ScheduleReport, write_schedule};

pub fn run<W: Write, G: SessionIdGenerator>(
    writer: &mut W,
    db: &mut Database,
    config: &SchedulerConfig,
    now: NaiveDateTime,
    json: bool,
    ids: &mut G,
) -> Result<()> {
    let records = db.list_fixed_tasks()?;
    let assignments = db.list_assignments()?;
    let work_hours = db.work_hours()?;

    let schedule = generate_master_schedule(
        &records,
        assignments,
        work_hours.as_ref(),
        now,
        config,
        ids,
    )
    .map_err(|e| match e {
        ScheduleError::MissingWorkHours => {
            anyhow::anyhow!("{e}. Run 'planner hours set START END' first")
        }
        ScheduleError::NoCandidateDays => anyhow::Error::from(e),
    })?;

    db.save_master_schedule(&schedule)
        .context("failed to store master schedule")?;
    tracing::info!(
        sessions = schedule.work_sessions.len(),
        assignments = schedule.assignments.len(),
        %now,
        "generated master schedule"
    );

    if json {
        let report = ScheduleReport::new(&schedule);
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    write_schedule(writer, &schedule)?;

    let short: Vec<_> = schedule
        .coverage()
        .into_iter()
        .filter(|c| c.is_short())
        .collect();
    if !short.is_empty() {
        writeln!(writer)?;
    }
    for c in short {
        writeln!(
            writer,
            "Could not fit more work for '{}' into your current load ({}/{SESSIONS_PER_ASSIGNMENT} sessions).",
            c.title, c.sessions
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use insta::assert_snapshot;
    use planner_core::{
        Assignment, AssignmentId, FixedTaskRecord, SequentialSessionIds, TaskId, WorkHours,
    };

    // 2025-03-03 is a Monday
    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_fixed_task(
            &FixedTaskRecord::new(TaskId::new("lecture").unwrap(), "Lecture")
                .with_times("9:00", "10:30")
                .weekly(&[Weekday::Mon, Weekday::Wed]),
        )
        .unwrap();
        db.upsert_assignments(&[
            Assignment::new(AssignmentId::new("essay").unwrap(), "Essay", at(5, 23, 59)),
            Assignment::new(AssignmentId::new("quiz").unwrap(), "Quiz", at(3, 21, 0)),
        ])
        .unwrap();
        db.set_work_hours(&WorkHours::parse("08:00", "20:00").unwrap())
            .unwrap();
        db
    }

    fn schedule_output(db: &mut Database, now: NaiveDateTime) -> String {
        let mut output = Vec::new();
        run(
            &mut output,
            db,
            &SchedulerConfig::default(),
            now,
            false,
            &mut SequentialSessionIds::new("ws"),
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn schedule_places_sessions_around_lecture() {
        let mut db = seeded_db();
        let output = schedule_output(&mut db, at(3, 8, 0));
        assert_snapshot!(output, @r"
        Schedule generated 2025-03-03 08:00

        Mon 2025-03-03
          08:00-09:00  Work on Quiz
          11:00-12:00  Work on Quiz
          12:00-13:00  Work on Quiz
        Tue 2025-03-04
          08:00-09:00  Work on Essay
          09:00-10:00  Work on Essay
        Wed 2025-03-05
          08:00-09:00  Work on Essay

        Deadlines
          2025-03-03 21:00  Quiz (3/3 sessions)
          2025-03-05 23:59  Essay (3/3 sessions)
        ");

        let stored = db.list_work_sessions().unwrap();
        let ids: Vec<_> = stored.iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, vec!["ws-1", "ws-2", "ws-3", "ws-4", "ws-5", "ws-6"]);
    }

    #[test]
    fn schedule_reports_shortfalls() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_fixed_task(
            &FixedTaskRecord::new(TaskId::new("shift").unwrap(), "Shift")
                .with_times("08:00", "20:00")
                .on_date(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()),
        )
        .unwrap();
        db.upsert_assignments(&[Assignment::new(
            AssignmentId::new("quiz").unwrap(),
            "Quiz",
            at(3, 21, 0),
        )])
        .unwrap();
        db.set_work_hours(&WorkHours::parse("08:00", "20:00").unwrap())
            .unwrap();

        let output = schedule_output(&mut db, at(3, 8, 0));
        assert_snapshot!(output, @r"
        Schedule generated 2025-03-03 08:00

        No work sessions.

        Deadlines
          2025-03-03 21:00  Quiz (0/3 sessions)

        Could not fit more work for 'Quiz' into your current load (0/3 sessions).
        ");
    }

    #[test]
    fn rerun_replaces_previous_sessions() {
        let mut db = seeded_db();
        schedule_output(&mut db, at(3, 8, 0));
        schedule_output(&mut db, at(4, 8, 0));

        // Quiz is past due on Tuesday; only Essay is scheduled.
        let sessions = db.list_work_sessions().unwrap();
        assert_eq!(sessions.len(), 3);
        assert!(sessions.iter().all(|s| s.assignment_id.as_str() == "essay"));
    }

    #[test]
    fn schedule_without_work_hours_fails() {
        let mut db = Database::open_in_memory().unwrap();
        let mut sink = Vec::new();
        let err = run(
            &mut sink,
            &mut db,
            &SchedulerConfig::default(),
            at(3, 8, 0),
            false,
            &mut SequentialSessionIds::new("ws"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("work hours not set"));
        assert!(err.to_string().contains("planner hours set"));
        assert!(db.load_master_schedule().unwrap().is_none());
    }
}
