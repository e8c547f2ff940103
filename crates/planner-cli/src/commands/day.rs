//! Day command: the agenda for a single calendar day.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use planner_core::{AgendaItem, AgendaKind, agenda_for};
use planner_db::Database;

use super::util::format_day;

pub fn run<W: Write>(writer: &mut W, db: &Database, day: NaiveDate) -> Result<()> {
    let Some(schedule) = db.load_master_schedule()? else {
        writeln!(writer, "No schedule generated yet. Run 'planner schedule'.")?;
        return Ok(());
    };

    writeln!(writer, "{}", format_day(day))?;
    let items = agenda_for(day, &schedule);
    if items.is_empty() {
        writeln!(writer, "  Nothing planned.")?;
    }
    for item in &items {
        writeln!(writer, "  {:<11}  {}", time_column(item), label(item))?;
    }
    Ok(())
}

fn time_column(item: &AgendaItem) -> String {
    match (item.start, item.end) {
        (Some(start), Some(end)) => format!("{start}-{end}"),
        (Some(start), None) => start.to_string(),
        _ => "untimed".to_string(),
    }
}

fn label(item: &AgendaItem) -> String {
    match item.kind {
        AgendaKind::Deadline => format!("Due: {}", item.title),
        AgendaKind::Commitment | AgendaKind::WorkSession => item.title.clone(),
    }
}
