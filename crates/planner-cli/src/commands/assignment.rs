//! Assignment commands: `planner assignment add|list|remove|import`.
//!
//! `import` reads the course feed's JSON export. Each entry carries an ID
//! (string or number), a title and a due date; entries without a due date
//! are skipped. Imported assignments replace the previously imported set,
//! while assignments added by hand are kept.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use planner_core::{Assignment, AssignmentId, AssignmentOrigin};
use planner_db::Database;
use serde::Deserialize;

use super::util::{format_timestamp, parse_datetime};

/// One entry of the course feed.
#[derive(Debug, Deserialize)]
struct FeedAssignment {
    id: FeedId,
    #[serde(alias = "name")]
    title: String,
    #[serde(alias = "due_at", alias = "deadline")]
    due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedId {
    Text(String),
    Number(i64),
}

impl FeedId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Stores a manually entered assignment.
pub fn add<W: Write>(writer: &mut W, db: &mut Database, title: &str, due: &str) -> Result<()> {
    let title = title.trim();
    anyhow::ensure!(!title.is_empty(), "Assignment title cannot be empty");
    let due_at = parse_datetime(due)?;

    let mut assignment = Assignment::new(AssignmentId::generate(), title, due_at);
    assignment.origin = AssignmentOrigin::Manual;
    db.upsert_assignments(std::slice::from_ref(&assignment))?;

    writeln!(
        writer,
        "Added assignment {}: {} (due {})",
        assignment.id,
        assignment.title,
        format_timestamp(assignment.due_at)
    )?;
    Ok(())
}

/// Lists assignments by deadline.
pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let assignments = db.list_assignments()?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&assignments)?)?;
        return Ok(());
    }

    if assignments.is_empty() {
        writeln!(writer, "No assignments.")?;
        return Ok(());
    }

    for a in &assignments {
        writeln!(
            writer,
            "{}  {:<8}  {}  {}",
            format_timestamp(a.due_at),
            a.origin.as_str(),
            a.id,
            a.title
        )?;
    }
    Ok(())
}

/// Removes an assignment and its generated sessions.
pub fn remove<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    if !db.delete_assignment(id)? {
        anyhow::bail!("No assignment with ID {id}");
    }
    writeln!(writer, "Removed assignment {id}")?;
    Ok(())
}

/// Replaces imported assignments with the feed read from `reader`.
pub fn import<R: Read, W: Write>(reader: R, writer: &mut W, db: &mut Database) -> Result<()> {
    let feed: Vec<FeedAssignment> =
        serde_json::from_reader(reader).context("failed to parse assignment feed")?;

    let mut assignments = Vec::with_capacity(feed.len());
    let mut skipped = 0usize;
    for entry in feed {
        let id = entry.id.into_string();
        let Some(due) = entry.due_date else {
            tracing::debug!(%id, "skipping assignment without due date");
            skipped += 1;
            continue;
        };
        let due_at = match parse_datetime(&due) {
            Ok(due_at) => due_at,
            Err(e) => {
                tracing::warn!(%id, error = %e, "skipping assignment with invalid due date");
                skipped += 1;
                continue;
            }
        };
        let id = AssignmentId::new(id).context("assignment feed entry has an empty ID")?;
        assignments.push(Assignment::new(id, entry.title, due_at));
    }

    let written = db.replace_assignments(&assignments)?;
    tracing::info!(written, skipped, "imported assignments");

    writeln!(writer, "Imported {written} assignments")?;
    if skipped > 0 {
        writeln!(writer, "Skipped {skipped} without a usable due date")?;
    }
    Ok(())
}
