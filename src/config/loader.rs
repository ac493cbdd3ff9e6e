// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file and return the raw, unvalidated `RawConfigFile`.
///
/// Only TOML deserialization happens here. Use [`load_and_validate`] to also
/// check intervals, observer paths and glob patterns.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), observers = config.observer.len(), "config parsed");

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the entry point the binary uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Pollwatch.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Pollwatch.toml")
}

/// Directory that relative observer paths are resolved against.
///
/// - For `configs/Pollwatch.toml` this is `configs`.
/// - For a bare file name (parent = "") this is the current directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_dir_of_nested_config() {
        assert_eq!(
            config_root_dir(Path::new("configs/Pollwatch.toml")),
            PathBuf::from("configs")
        );
    }

    #[test]
    fn root_dir_of_bare_file_is_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config_root_dir(Path::new("Pollwatch.toml")), cwd);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_from_path("/definitely/not/here/Pollwatch.toml").unwrap_err();
        assert!(matches!(err, crate::errors::PollwatchError::IoError(_)));
    }
}
