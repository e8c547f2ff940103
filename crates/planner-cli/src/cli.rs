//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Study planner.
///
/// Keeps your fixed commitments and assignment deadlines, and fills the gaps
/// with one-hour work sessions ahead of each deadline.
#[derive(Debug, Parser)]
#[command(name = "planner", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage fixed commitments (classes, shifts, practice).
    #[command(subcommand)]
    Task(TaskAction),

    /// Manage assignments and their deadlines.
    #[command(subcommand)]
    Assignment(AssignmentAction),

    /// Manage the daily work window.
    #[command(subcommand)]
    Hours(HoursAction),

    /// Generate work sessions and store the master schedule.
    Schedule {
        /// Schedule as if it were this time (default: now).
        #[arg(long)]
        now: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the stored master schedule.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show everything happening on a day.
    Day {
        /// Date as YYYY-MM-DD (default: today).
        date: Option<String>,
    },

    /// Drop generated work sessions.
    Clear,
}

/// Fixed task subcommands.
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Add a fixed task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,

        /// Start time (e.g., 9:00, 2:30pm, 14:30).
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// End time.
        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Single date as YYYY-MM-DD.
        #[arg(long, conflicts_with = "days")]
        date: Option<String>,

        /// Weekly days, comma-separated (e.g., M,W,F or TH).
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<String>>,
    },

    /// List fixed tasks.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Remove a fixed task.
    Remove {
        /// Task ID.
        id: String,
    },
}

/// Assignment subcommands.
#[derive(Debug, Subcommand)]
pub enum AssignmentAction {
    /// Add an assignment by hand.
    Add {
        /// Assignment title.
        #[arg(long)]
        title: String,

        /// Due date and time (e.g., 2025-03-07T23:59 or RFC 3339).
        #[arg(long)]
        due: String,
    },

    /// List assignments.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Remove an assignment.
    Remove {
        /// Assignment ID.
        id: String,
    },

    /// Replace imported assignments from a JSON feed.
    Import {
        /// JSON file to read (default: stdin).
        file: Option<PathBuf>,
    },
}

/// Work-window subcommands.
#[derive(Debug, Subcommand)]
pub enum HoursAction {
    /// Set the daily work window.
    Set {
        /// Window start (e.g., 09:00).
        start: String,

        /// Window end (e.g., 22:00).
        end: String,
    },

    /// Show the daily work window.
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_task_add_with_days() {
        let cli = Cli::try_parse_from([
            "planner", "task", "add", "--title", "Lab", "--start", "9:00", "--end", "10:00",
            "--days", "M,W,F",
        ])
        .unwrap();
        let Some(Commands::Task(TaskAction::Add { days, .. })) = cli.command else {
            panic!("expected task add");
        };
        assert_eq!(days, Some(vec!["M".into(), "W".into(), "F".into()]));
    }

    #[test]
    fn date_and_days_conflict() {
        let result = Cli::try_parse_from([
            "planner", "task", "add", "--title", "Lab", "--date", "2025-03-03", "--days", "M",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn start_requires_end() {
        let result = Cli::try_parse_from(["planner", "task", "add", "--title", "Lab", "--start", "9"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["planner", "show", "--verbose", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
