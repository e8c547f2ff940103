use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use planner_cli::commands::util::{parse_date, parse_datetime};
use planner_cli::commands::{assignment, clear, day, hours, schedule, show, task};
use planner_cli::{AssignmentAction, Cli, Commands, Config, HoursAction, TaskAction};
use planner_core::UuidSessionIds;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(planner_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = planner_db::Database::open(&config.database_path).with_context(|| {
        format!("failed to open {}", config.database_path.display())
    })?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut db, config) = open_database(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Task(action) => match action {
            TaskAction::Add {
                title,
                start,
                end,
                date,
                days,
            } => {
                let record = task::build_record(
                    title,
                    start.as_deref(),
                    end.as_deref(),
                    date.as_deref(),
                    days.as_deref().unwrap_or_default(),
                )?;
                task::add(&mut out, &mut db, &record)?;
            }
            TaskAction::List { json } => task::list(&mut out, &db, *json)?,
            TaskAction::Remove { id } => task::remove(&mut out, &mut db, id)?,
        },
        Commands::Assignment(action) => match action {
            AssignmentAction::Add { title, due } => assignment::add(&mut out, &mut db, title, due)?,
            AssignmentAction::List { json } => assignment::list(&mut out, &db, *json)?,
            AssignmentAction::Remove { id } => assignment::remove(&mut out, &mut db, id)?,
            AssignmentAction::Import { file } => match file {
                Some(path) => {
                    let reader = std::fs::File::open(path)
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    assignment::import(io::BufReader::new(reader), &mut out, &mut db)?;
                }
                None => assignment::import(io::stdin().lock(), &mut out, &mut db)?,
            },
        },
        Commands::Hours(action) => match action {
            HoursAction::Set { start, end } => hours::set(&mut out, &mut db, start, end)?,
            HoursAction::Show => hours::show(&mut out, &db)?,
        },
        Commands::Schedule { now, json } => {
            let now = match now {
                Some(now) => parse_datetime(now)?,
                None => Local::now().naive_local(),
            };
            schedule::run(
                &mut out,
                &mut db,
                &config.scheduler_config(),
                now,
                *json,
                &mut UuidSessionIds,
            )?;
        }
        Commands::Show { json } => show::run(&mut out, &db, *json)?,
        Commands::Day { date } => {
            let date = match date {
                Some(date) => parse_date(date)?,
                None => Local::now().date_naive(),
            };
            day::run(&mut out, &db, date)?;
        }
        Commands::Clear => clear::run(&mut out, &mut db)?,
    }

    out.flush()?;
    Ok(())
}
