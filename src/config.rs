//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML config file (`$COPYCURE_CONFIG`, or `config.toml` in the
//!    platform config directory)
//! 3. `COPYCURE_*` environment variables
//! 4. CLI flags
//!
//! # Example config file
//!
//! ```toml
//! mode = "mem"
//! exclude = [".git/", ".venv/"]
//! database = "/tmp/copycure.db"
//! delete_empty = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DeletionMode;
use crate::cli::Cli;
use crate::index::{IndexMode, DEFAULT_DATABASE_PATH};
use crate::scanner::{parse_exclusions, PathFilter};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "COPYCURE_";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "COPYCURE_CONFIG";

/// Errors raised while building the scan configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// No directory was given.
    #[error("no directory to scan was given (use -i <dir>)")]
    MissingDirectory,

    /// The config file or environment could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Persistent defaults read from the config file and environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Index backend.
    pub mode: IndexMode,
    /// Exclusion substrings applied to every scan.
    pub exclude: Vec<String>,
    /// Location of the durable index store.
    pub database: PathBuf,
    /// Include files of 10 bytes or fewer.
    pub delete_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: IndexMode::Sql,
            exclude: Vec::new(),
            database: PathBuf::from(DEFAULT_DATABASE_PATH),
            delete_empty: false,
        }
    }
}

impl Config {
    /// Load from the default config location plus environment.
    ///
    /// A missing config file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Self::extract(
                Figment::from(Serialized::defaults(Config::default())).merge(Self::env()),
            ),
        }
    }

    /// Load from an explicit config file plus environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment value is malformed.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        log::debug!("Loading config from {}", path.display());
        Self::extract(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file(path))
                .merge(Self::env()),
        )
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).ignore(&["config"])
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Get the config file path: `$COPYCURE_CONFIG` or the platform default.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("com", "copycure", "copycure")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Fully resolved settings for one scan. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Root directory.
    pub root: PathBuf,
    /// Exclusion substrings (no empty entries).
    pub exclude: Vec<String>,
    /// Include files of 10 bytes or fewer.
    pub delete_empty: bool,
    /// Delete without asking.
    pub no_confirm: bool,
    /// Only list duplicates.
    pub list_only: bool,
    /// Index backend.
    pub mode: IndexMode,
    /// Durable store location.
    pub database: PathBuf,
}

impl ScanOptions {
    /// Merge CLI flags over loaded config.
    ///
    /// CLI exclusions replace configured ones; boolean flags can only turn
    /// behavior on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] without `-i`.
    pub fn resolve(cli: &Cli, config: Config) -> Result<Self, ConfigError> {
        let root = cli
            .directory
            .clone()
            .filter(|d| !d.as_os_str().is_empty())
            .ok_or(ConfigError::MissingDirectory)?;

        let exclude = match &cli.exclude {
            Some(csv) => parse_exclusions(csv),
            None => config.exclude.into_iter().filter(|s| !s.is_empty()).collect(),
        };

        Ok(Self {
            root,
            exclude,
            delete_empty: cli.delete_empty || config.delete_empty,
            no_confirm: cli.no_confirm,
            list_only: cli.list_only,
            mode: cli.mode.unwrap_or(config.mode),
            database: cli.database.clone().unwrap_or(config.database),
        })
    }

    /// Path filter for these options.
    #[must_use]
    pub fn filter(&self) -> PathFilter {
        PathFilter::new(self.exclude.iter().cloned(), self.delete_empty)
    }

    /// Deletion mode for these options.
    #[must_use]
    pub fn deletion_mode(&self) -> DeletionMode {
        DeletionMode::from_flags(self.list_only, self.no_confirm)
    }
}
