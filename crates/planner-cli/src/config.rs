//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use planner_core::{ClockTime, SchedulerConfig};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Allocator settings.
    #[serde(default)]
    pub scheduler: SchedulerSettings,
}

/// The `[scheduler]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSettings {
    /// Latest time a work session may end, whatever the work window says.
    pub latest_end: ClockTime,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            latest_end: SchedulerConfig::default().latest_end,
        }
    }
}

impl From<&SchedulerSettings> for SchedulerConfig {
    fn from(settings: &SchedulerSettings) -> Self {
        Self {
            latest_end: settings.latest_end,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("latest_end", &self.scheduler.latest_end.to_string())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("planner.db"),
            scheduler: SchedulerSettings::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // PLANNER_SCHEDULER__LATEST_END -> scheduler.latest_end
        figment = figment.merge(Env::prefixed("PLANNER_").split("__"));

        figment.extract()
    }

    /// The allocator configuration derived from the `[scheduler]` table.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::from(&self.scheduler)
    }
}

/// Returns the platform-specific config directory for the planner.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("planner"))
}

/// Returns the platform-specific data directory for the planner.
///
/// On Linux: `~/.local/share/planner`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("planner"))
}
