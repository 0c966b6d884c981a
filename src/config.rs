//! Configuration for fixline sessions.
//!
//! Settings are read from `~/.fixline/config.toml`; every key is optional:
//!
//! ```toml
//! # Number of output chunks kept in the session history
//! history_max_count = 50
//!
//! # Text printed before reading a prompt answer
//! user_invitation = "> "
//!
//! [answers]
//! positive = ["", "y", "Y", "yes", "Yes", "YES"]
//! negative = ["n", "N", "no", "No", "NO"]
//! ```
//!
//! Answers are matched exactly, so casing variants must be listed.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConsoleError, Result};
use crate::history::HISTORY_LIMIT;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of history entries
    pub history_max_count: usize,
    /// Invitation printed before prompt input
    pub user_invitation: String,
    /// Accepted dialog answers
    pub answers: AnswerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_max_count: HISTORY_LIMIT,
            user_invitation: "> ".to_string(),
            answers: AnswerConfig::default(),
        }
    }
}

/// Yes/no answer lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            positive: ["", "y", "Y", "yes", "Yes", "YES"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            negative: ["n", "N", "no", "No", "NO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnswerConfig {
    pub fn is_positive(&self, answer: &str) -> bool {
        self.positive.iter().any(|a| a == answer)
    }

    pub fn is_negative(&self, answer: &str) -> bool {
        self.negative.iter().any(|a| a == answer)
    }

    /// Whether `answer` is in either list
    pub fn accepts(&self, answer: &str) -> bool {
        self.is_positive(answer) || self.is_negative(answer)
    }
}

impl Config {
    /// Load configuration from the default file, falling back to defaults
    pub fn load() -> Self {
        match Self::get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(ConsoleError::ConfigParse)
    }

    /// Save configuration to the default file, returning its path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::get_config_path().ok_or(ConsoleError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to `path`, creating missing parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_error = |source: std::io::Error| ConsoleError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };
        let content = toml::to_string_pretty(self).map_err(ConsoleError::ConfigSerialize)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)
    }

    /// Get config file path
    pub fn get_config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }
}

/// `~/.fixline`; not created here
pub fn data_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".fixline"))
}

/// Create `~/.fixline` if needed, logging a warning when that fails
pub fn ensure_data_dir() -> Option<PathBuf> {
    let dir = data_dir()?;
    match fs::create_dir_all(&dir) {
        Ok(()) => Some(dir),
        Err(e) => {
            warn!("Could not create {}: {}", dir.display(), e);
            None
        }
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
