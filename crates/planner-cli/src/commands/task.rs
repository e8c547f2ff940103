//! Fixed task commands: `planner task add|list|remove`.

use std::io::Write;

use anyhow::{Context, Result};
use planner_core::commitment::parse_weekday;
use planner_core::{ClockTime, FixedTask, FixedTaskRecord, Occurrence, TaskId, TimeRange};
use planner_db::Database;

use super::util::parse_date;

/// Stored sessions were placed around the old set of commitments.
const REGENERATE_HINT: &str = "Run 'planner schedule' to regenerate work sessions.";

/// Builds a validated record from command-line input.
///
/// Clock strings are stored as entered; they are only checked here so that
/// typos are reported instead of silently making the task non-blocking.
pub fn build_record(
    title: &str,
    start: Option<&str>,
    end: Option<&str>,
    date: Option<&str>,
    days: &[String],
) -> Result<FixedTaskRecord> {
    let title = title.trim();
    anyhow::ensure!(!title.is_empty(), "Task title cannot be empty");

    let mut record = FixedTaskRecord::new(TaskId::generate(), title);

    if let (Some(start), Some(end)) = (start, end) {
        let start_clock =
            ClockTime::parse(start).with_context(|| format!("Invalid start time: {start}"))?;
        let end_clock =
            ClockTime::parse(end).with_context(|| format!("Invalid end time: {end}"))?;
        anyhow::ensure!(
            TimeRange::new(start_clock, end_clock).is_some(),
            "Task must end after it starts, got {start_clock}-{end_clock}"
        );
        record = record.with_times(start, end);
    }

    if let Some(date) = date {
        record = record.on_date(parse_date(date)?);
    } else if !days.is_empty() {
        let weekdays = days
            .iter()
            .map(|d| parse_weekday(d).with_context(|| format!("Unknown weekday: {d}")))
            .collect::<Result<Vec<_>>>()?;
        record = record.weekly(&weekdays);
    }

    Ok(record)
}

/// Stores a new fixed task.
pub fn add<W: Write>(writer: &mut W, db: &mut Database, record: &FixedTaskRecord) -> Result<()> {
    db.insert_fixed_task(record)?;
    tracing::debug!(id = %record.id, "added fixed task");

    let task = FixedTask::from_record(record);
    writeln!(writer, "Added task {}: {}", task.id, describe(&task))?;
    if task.time_range.is_none() {
        writeln!(writer, "Note: untimed tasks do not block work sessions.")?;
    }
    if task.occurrence == Occurrence::Unscheduled {
        writeln!(writer, "Note: task has no date or weekdays and never occurs.")?;
    }
    writeln!(writer, "{REGENERATE_HINT}")?;
    Ok(())
}

/// Lists fixed tasks.
pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let records = db.list_fixed_tasks()?;

    if json {
        let tasks: Vec<FixedTask> = records.iter().map(FixedTask::from_record).collect();
        writeln!(writer, "{}", serde_json::to_string_pretty(&tasks)?)?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(writer, "No fixed tasks.")?;
        return Ok(());
    }

    for record in &records {
        let task = FixedTask::from_record(record);
        writeln!(writer, "{}  {}", task.id, describe(&task))?;
    }
    Ok(())
}

/// Removes a fixed task.
pub fn remove<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    if !db.delete_fixed_task(id)? {
        anyhow::bail!("No fixed task with ID {id}");
    }
    writeln!(writer, "Removed task {id}")?;
    writeln!(writer, "{REGENERATE_HINT}")?;
    Ok(())
}

fn describe(task: &FixedTask) -> String {
    let time = task
        .time_range
        .map_or_else(|| "untimed".to_string(), |r| r.to_string());
    let when = match &task.occurrence {
        Occurrence::OnDate(date) => date.format("%Y-%m-%d").to_string(),
        Occurrence::Weekly(days) => format!("every {days}"),
        Occurrence::Unscheduled => "unscheduled".to_string(),
    };
    format!("{} ({time}, {when})", task.title)
}
