//! Work-window commands: `planner hours set|show`.

use std::io::Write;

use anyhow::{Context, Result};
use planner_core::WorkHours;
use planner_db::Database;

/// Stores the daily work window.
pub fn set<W: Write>(writer: &mut W, db: &mut Database, start: &str, end: &str) -> Result<()> {
    let hours = WorkHours::parse(start, end).context("invalid work hours")?;
    db.set_work_hours(&hours)?;
    writeln!(writer, "Work hours set to {}-{}", hours.start(), hours.end())?;
    writeln!(writer, "Run 'planner schedule' to regenerate work sessions.")?;
    Ok(())
}

/// Prints the daily work window.
pub fn show<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    match db.work_hours()? {
        Some(hours) => writeln!(writer, "Work hours: {}-{}", hours.start(), hours.end())?,
        None => writeln!(
            writer,
            "Work hours not set. Run 'planner hours set START END'."
        )?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_of(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn show_before_set() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(
            output_of(|w| show(w, &db)),
            "Work hours not set. Run 'planner hours set START END'.\n"
        );
    }

    #[test]
    fn set_normalizes_clock_strings() {
        let mut db = Database::open_in_memory().unwrap();
        output_of(|w| set(w, &mut db, "9:00am", "10:00pm"));
        assert_eq!(output_of(|w| show(w, &db)), "Work hours: 09:00-22:00\n");
    }

    #[test]
    fn set_rejects_inverted_window() {
        let mut db = Database::open_in_memory().unwrap();
        let mut sink = Vec::new();
        let err = set(&mut sink, &mut db, "18:00", "08:00").unwrap_err();
        assert!(format!("{err:#}").contains("must end after they start"));
        assert_eq!(db.work_hours().unwrap(), None);
    }
}
