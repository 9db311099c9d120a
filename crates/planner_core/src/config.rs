//! Runtime configuration resolved from environment and platform defaults.
//!
//! # Invariants
//! - Every path is derived from one data directory unless overridden.
//! - Blank environment values count as unset.

use crate::logging::LogLevel;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "PLANNER_DATA_DIR";
pub const DB_PATH_ENV: &str = "PLANNER_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PLANNER_LOG_LEVEL";
pub const MAX_BACKUPS_ENV: &str = "PLANNER_MAX_BACKUPS";

pub const DEFAULT_MAX_BACKUPS: usize = 7;

const APP_DIR_NAME: &str = "planner";
const HOME_FALLBACK_DIR_NAME: &str = ".planner";
const DB_FILE_NAME: &str = "planner.db";
const LOG_DIR_NAME: &str = "logs";

/// Resolved locations and knobs for one planner process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LogLevel,
    /// Number of startup backups kept next to the database.
    pub max_backups: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither an override nor a platform data/home directory is available.
    NoDataDir,
    InvalidLogLevel(String),
    InvalidMaxBackups(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a data directory; set {DATA_DIR_ENV}"
            ),
            Self::InvalidLogLevel(value) => {
                write!(f, "invalid {LOG_LEVEL_ENV} value `{value}`")
            }
            Self::InvalidMaxBackups(value) => write!(
                f,
                "invalid {MAX_BACKUPS_ENV} value `{value}`; expected a non-negative integer"
            ),
        }
    }
}

impl Error for ConfigError {}

impl PlannerConfig {
    /// Default layout rooted at `data_dir`.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            log_level: LogLevel::build_default(),
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }

    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let data_dir = match value(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };
        let mut config = Self::for_data_dir(data_dir);

        if let Some(path) = value(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = value(LOG_LEVEL_ENV) {
            config.log_level = level
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel(level))?;
        }
        if let Some(raw) = value(MAX_BACKUPS_ENV) {
            config.max_backups = raw
                .parse()
                .map_err(|_| ConfigError::InvalidMaxBackups(raw))?;
        }

        Ok(config)
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .or_else(|| dirs::home_dir().map(|home| home.join(HOME_FALLBACK_DIR_NAME)))
}
