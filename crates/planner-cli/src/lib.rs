//! Study planner CLI library.
//!
//! This crate provides the CLI interface for the study planner.

mod cli;
pub mod commands;
mod config;

pub use cli::{AssignmentAction, Cli, Commands, HoursAction, TaskAction};
pub use config::Config;
