//! Runtime configuration
//!
//! There is no configuration file. Values come from command-line flags with
//! environment-variable fallbacks (see the CLI), layered over the defaults
//! defined here.

use std::path::PathBuf;

use chrono::Weekday;

use crate::logging::rotation::WeeklyRotation;
use crate::tasks::Privilege;

pub const DEFAULT_LOG_FILE: &str = "upkeep.log";
pub const DEFAULT_PACKAGE_MANAGER: &str = "apt";

/// Where and how the maintenance log is written
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub rotate_on: Weekday,
    /// Number of rotated files kept besides the active one
    pub backups: usize,
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl LogConfig {
    /// `$XDG_STATE_HOME/upkeep/logs`, falling back to the local data dir and
    /// finally the temp dir
    pub fn default_directory() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("upkeep")
            .join("logs")
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn rotation(&self) -> WeeklyRotation {
        WeeklyRotation {
            weekday: self.rotate_on,
            backups: self.backups,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let rotation = WeeklyRotation::default();
        Self {
            directory: Self::default_directory(),
            file_name: DEFAULT_LOG_FILE.to_string(),
            rotate_on: rotation.weekday,
            backups: rotation.backups,
            level: "info".to_string(),
        }
    }
}

/// Complete configuration for one process
#[derive(Debug, Clone)]
pub struct UpkeepConfig {
    pub log: LogConfig,
    pub notifications: bool,
    pub privilege: Privilege,
    pub package_manager: String,
}

impl Default for UpkeepConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            notifications: true,
            privilege: Privilege::default(),
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
        }
    }
}
