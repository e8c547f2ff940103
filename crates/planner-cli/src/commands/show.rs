//! Show command for printing the stored master schedule.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use planner_core::{AssignmentCoverage, MasterSchedule, SESSIONS_PER_ASSIGNMENT, WorkSession};
use planner_db::Database;
use serde::Serialize;

use super::util::{format_day, format_timestamp};

/// JSON shape for `schedule --json` and `show --json`.
#[derive(Debug, Serialize)]
pub struct ScheduleReport<'a> {
    #[serde(flatten)]
    pub schedule: &'a MasterSchedule,
    pub coverage: Vec<AssignmentCoverage>,
}

impl<'a> ScheduleReport<'a> {
    pub fn new(schedule: &'a MasterSchedule) -> Self {
        Self {
            schedule,
            coverage: schedule.coverage(),
        }
    }
}

pub fn run<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let Some(schedule) = db.load_master_schedule()? else {
        writeln!(writer, "No schedule generated yet. Run 'planner schedule'.")?;
        return Ok(());
    };

    if json {
        let report = ScheduleReport::new(&schedule);
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_schedule(writer, &schedule)?;
    }
    Ok(())
}

/// Writes sessions grouped by day, followed by each upcoming deadline and
/// how many sessions it received.
pub fn write_schedule<W: Write>(writer: &mut W, schedule: &MasterSchedule) -> Result<()> {
    writeln!(
        writer,
        "Schedule generated {}",
        format_timestamp(schedule.generated_at)
    )?;
    writeln!(writer)?;

    let mut by_day: BTreeMap<NaiveDate, Vec<&WorkSession>> = BTreeMap::new();
    for session in &schedule.work_sessions {
        by_day.entry(session.date).or_default().push(session);
    }

    if by_day.is_empty() {
        writeln!(writer, "No work sessions.")?;
    }
    for (day, mut sessions) in by_day {
        sessions.sort_by_key(|s| s.start);
        writeln!(writer, "{}", format_day(day))?;
        for s in sessions {
            writeln!(
                writer,
                "  {}-{}  {}",
                s.start.format("%H:%M"),
                s.end.format("%H:%M"),
                s.title
            )?;
        }
    }

    let coverage = schedule.coverage();
    if !coverage.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Deadlines")?;
        for c in &coverage {
            writeln!(
                writer,
                "  {}  {} ({}/{SESSIONS_PER_ASSIGNMENT} sessions)",
                format_timestamp(c.due_at),
                c.title,
                c.sessions
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use insta::assert_snapshot;
    use planner_core::{
        Assignment, AssignmentId, SchedulerConfig, SequentialSessionIds, WorkHours,
        generate_master_schedule,
    };

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn show_without_schedule() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            output_of(|w| run(w, &db, false)),
            "No schedule generated yet. Run 'planner schedule'.\n"
        );
    }

    #[test]
    fn show_prints_stored_schedule() {
        let mut db = Database::open_in_memory().unwrap();
        db.upsert_assignments(&[Assignment::new(
            AssignmentId::new("hw").unwrap(),
            "Problem set",
            at(4, 17),
        )])
        .unwrap();
        let schedule = generate_master_schedule(
            &[],
            db.list_assignments().unwrap(),
            Some(&WorkHours::parse("09:00", "17:00").unwrap()),
            at(3, 12),
            &SchedulerConfig::default(),
            &mut SequentialSessionIds::new("ws"),
        )
        .unwrap();
        db.save_master_schedule(&schedule).unwrap();

        let output = output_of(|w| run(w, &db, false));
        assert_snapshot!(output, @r"
        Schedule generated 2025-03-03 12:00

        Mon 2025-03-03
          09:00-10:00  Work on Problem set
          10:00-11:00  Work on Problem set
        Tue 2025-03-04
          09:00-10:00  Work on Problem set

        Deadlines
          2025-03-04 17:00  Problem set (3/3 sessions)
        ");
    }

    #[test]
    fn show_json_includes_coverage() {
        let mut db = Database::open_in_memory().unwrap();
        let schedule = generate_master_schedule(
            &[],
            vec![Assignment::new(AssignmentId::new("hw").unwrap(), "Essay", at(5, 12))],
            Some(&WorkHours::parse("09:00", "17:00").unwrap()),
            at(3, 8),
            &SchedulerConfig::default(),
            &mut SequentialSessionIds::new("ws"),
        )
        .unwrap();
        db.upsert_assignments(&schedule.assignments).unwrap();
        db.save_master_schedule(&schedule).unwrap();

        let output = output_of(|w| run(w, &db, true));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["work_sessions"].as_array().unwrap().len(), 3);
        assert_eq!(value["coverage"][0]["assignment_id"], "hw");
        assert_eq!(value["coverage"][0]["sessions"], 3);
        assert_eq!(value["generated_at"], "2025-03-03T08:00:00");
    }
}
