//! Runtime configuration resolved from the environment.
//!
//! | variable            | meaning                         | default                      |
//! |---------------------|---------------------------------|------------------------------|
//! | `TAREFAS_DB`        | SQLite database file            | `./tarefas.sqlite3`          |
//! | `TAREFAS_LOG_LEVEL` | `trace\|debug\|info\|warn\|error` | [`default_log_level`]        |
//! | `TAREFAS_LOG_DIR`   | directory for rolling log files | unset: file logging disabled |
//!
//! Relative paths are resolved against the current working directory.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "TAREFAS_DB";
pub const LOG_LEVEL_ENV: &str = "TAREFAS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TAREFAS_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "tarefas.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{LOG_LEVEL_ENV}: {err}"),
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::CurrentDir(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Absolute path of the database file.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Absolute log directory; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(&cwd, |name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(
        base_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_path = read(DB_PATH_ENV)
            .map(|value| resolve(base_dir, value.trim()))
            .unwrap_or_else(|| base_dir.join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = read(LOG_DIR_ENV).map(|value| resolve(base_dir, value.trim()));

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

fn resolve(base_dir: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
