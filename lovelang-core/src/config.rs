//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/lovelang/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/lovelang/` (~/.config/lovelang/)
//! - Data: `$XDG_DATA_HOME/lovelang/` (~/.local/share/lovelang/)
//! - State/Logs: `$XDG_STATE_HOME/lovelang/` (~/.local/state/lovelang/)

use crate::bank::QuestionBank;
use crate::conclusions::Conclusions;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Quiz behaviour
    #[serde(default)]
    pub quiz: QuizConfig,

    /// Reference data overrides
    #[serde(default)]
    pub data: DataConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Quiz and report tuning
#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    /// Snapshots older than this many days are not resumed
    #[serde(default = "default_resume_window_days")]
    pub resume_window_days: i64,

    /// Pause between selecting an option and moving on, in milliseconds
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,

    /// Receiving score spread above which preferences count as "clear"
    #[serde(default = "default_strong_preference_spread")]
    pub strong_preference_spread: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            resume_window_days: default_resume_window_days(),
            advance_delay_ms: default_advance_delay_ms(),
            strong_preference_spread: default_strong_preference_spread(),
        }
    }
}

impl QuizConfig {
    /// Resume window as a duration.
    pub fn resume_window(&self) -> chrono::Duration {
        chrono::Duration::days(self.resume_window_days)
    }
}

/// Upper bound for `quiz.resume_window_days` (ten years).
pub const MAX_RESUME_WINDOW_DAYS: i64 = 3650;

fn default_resume_window_days() -> i64 {
    7
}

fn default_advance_delay_ms() -> u64 {
    200
}

fn default_strong_preference_spread() -> u32 {
    20
}

/// Paths to replacement reference documents.
///
/// When unset, the documents bundled with the library are used.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct DataConfig {
    /// Question bank JSON
    pub questions_path: Option<PathBuf>,
    /// Conclusions JSON
    pub conclusions_path: Option<PathBuf>,
}

impl DataConfig {
    /// The configured question bank, or the bundled one.
    pub fn question_bank(&self) -> Result<QuestionBank> {
        match &self.questions_path {
            Some(path) => QuestionBank::load(path),
            None => QuestionBank::bundled(),
        }
    }

    /// The configured conclusions document, or the bundled one.
    pub fn conclusions(&self) -> Result<Conclusions> {
        match &self.conclusions_path {
            Some(path) => Conclusions::load(path),
            None => Conclusions::bundled(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESUME_WINDOW_DAYS).contains(&self.quiz.resume_window_days) {
            return Err(Error::Config(format!(
                "quiz.resume_window_days must be between 1 and {}, got {}",
                MAX_RESUME_WINDOW_DAYS, self.quiz.resume_window_days
            )));
        }
        if self.logging.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/lovelang/config.toml` (~/.config/lovelang/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("lovelang").join("config.toml")
    }

    /// Returns the data directory path (for the session database)
    ///
    /// `$XDG_DATA_HOME/lovelang/` (~/.local/share/lovelang/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("lovelang")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/lovelang/` (~/.local/state/lovelang/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("lovelang")
    }

    /// Returns the session database file path
    ///
    /// `$XDG_DATA_HOME/lovelang/sessions.db` (~/.local/share/lovelang/sessions.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("sessions.db")
    }
}
