//! Error types for console sessions and configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Progress bar needs a total greater than zero")]
    EmptyProgress,

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[source] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[source] toml::ser::Error),

    #[error("Failed to write config to {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not determine config path")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
