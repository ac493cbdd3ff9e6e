// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// The whole snapshot of an observed root could not be taken.
    #[error("failed to capture snapshot of {path:?}: {source}")]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("observer for {0:?} has been destroyed")]
    ObserverDestroyed(PathBuf),

    #[error("{failures} listener callback(s) failed for {path:?}: {message}")]
    Listener {
        path: PathBuf,
        failures: usize,
        message: String,
    },

    #[error("Monitor error: {0}")]
    Monitor(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<globset::Error> for PollwatchError {
    fn from(err: globset::Error) -> Self {
        PollwatchError::Pattern(err.to_string())
    }
}

impl From<regex::Error> for PollwatchError {
    fn from(err: regex::Error) -> Self {
        PollwatchError::Pattern(err.to_string())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollwatchError>;
