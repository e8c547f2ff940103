//! Clear command: drop generated work sessions.

use std::io::Write;

use anyhow::Result;
use planner_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &mut Database) -> Result<()> {
    let sessions = db.list_work_sessions()?.len();
    db.clear_master_schedule()?;
    writeln!(writer, "Cleared {sessions} generated work sessions.")?;
    Ok(())
}
