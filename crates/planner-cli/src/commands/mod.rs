//! CLI subcommand implementations.

pub mod assignment;
pub mod clear;
pub mod day;
pub mod hours;
pub mod schedule;
pub mod show;
pub mod task;
pub mod util;
