//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Merge flags, environment variables and platform defaults.
//!
//! # Invariants
//! - The resolved database path is always absolute or explicitly given.
//! - File logging is enabled only when a log directory is configured.

use anyhow::{anyhow, Result};
use clap::Args;
use cocktail_log_core::{default_log_level, LogLevel};
use directories::ProjectDirs;
use std::path::PathBuf;

const DB_FILE_NAME: &str = "cocktail_log.sqlite3";

/// Flags shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// SQLite database file
    #[arg(long, global = true, env = "COCKTAIL_LOG_DB")]
    pub db: Option<PathBuf>,
    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "COCKTAIL_LOG_LOG_LEVEL")]
    pub log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "COCKTAIL_LOG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Resolves configuration, falling back to the platform data directory.
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let db_path = match &args.db {
            Some(path) => path.clone(),
            None => default_db_path()?,
        };
        let log_level = match &args.log_level {
            Some(level) => level.parse::<LogLevel>()?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir: args.log_dir.clone(),
        })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cocktail_log")
        .ok_or_else(|| anyhow!("cannot determine a data directory; pass --db"))?;
    Ok(dirs.data_dir().join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, GlobalArgs};
    use cocktail_log_core::LogLevel;
    use std::path::PathBuf;

    #[test]
    fn explicit_flags_win() {
        let args = GlobalArgs {
            db: Some(PathBuf::from("/tmp/reviews.sqlite3")),
            log_level: Some("warning".to_string()),
            log_dir: None,
        };
        let config = AppConfig::resolve(&args).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/reviews.sqlite3"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn unknown_level_is_an_error() {
        let args = GlobalArgs {
            db: Some(PathBuf::from("/tmp/reviews.sqlite3")),
            log_level: Some("loud".to_string()),
            log_dir: None,
        };
        assert!(AppConfig::resolve(&args).is_err());
    }
}
