// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::Result;
use crate::filter::{AndFilter, FileFilter, GlobProfileFilter, VisibleFilter};
use crate::monitor::ObserverConfig;
use crate::types::CaseSensitivity;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [monitor]
/// interval = "500ms"
///
/// [default]
/// include = ["**/*.rs"]
/// exclude = ["**/target"]
///
/// [observer.sources]
/// path = "src"
/// ```
///
/// Every section is optional for deserialization; validation requires at
/// least one `[observer.<name>]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub monitor: MonitorSection,

    #[serde(default)]
    pub default: DefaultSection,

    /// Keys are observer names, used in log lines.
    #[serde(default)]
    pub observer: BTreeMap<String, ObserverSection>,
}

/// `[monitor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSection {
    /// Poll interval with a unit suffix: `ms`, `s`, `m` or `h`.
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_interval() -> String {
    "1s".to_string()
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interval: default_interval(),
        }
    }
}

/// `[default]` section: values observers inherit unless they override them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultSection {
    /// Root-relative globs a file must match. Empty means every file.
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub case_sensitivity: CaseSensitivity,

    /// Skip entries whose name starts with a dot (and everything below them).
    #[serde(default)]
    pub ignore_hidden: bool,
}

/// `[observer.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverSection {
    /// Directory (or single file) to observe, relative to the config file.
    pub path: String,

    /// If `None`, the observer uses `default.include`.
    #[serde(default)]
    pub include: Option<Vec<String>>,

    /// If `None`, the observer uses `default.exclude`.
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// If true, `default.include` is appended to `include`.
    #[serde(default)]
    pub append_default_include: bool,

    /// If true, `default.exclude` is appended to `exclude`.
    #[serde(default)]
    pub append_default_exclude: bool,

    #[serde(default)]
    pub case_sensitivity: Option<CaseSensitivity>,

    #[serde(default)]
    pub ignore_hidden: Option<bool>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub interval: Duration,
    /// Sorted by name.
    pub observers: Vec<ObserverSpec>,
}

impl ConfigFile {
    /// Used by validation once every invariant has been checked.
    pub(crate) fn new_unchecked(interval: Duration, observers: Vec<ObserverSpec>) -> Self {
        Self {
            interval,
            observers,
        }
    }
}

/// One observer with defaults already merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverSpec {
    pub name: String,
    /// As written in the config; see [`ObserverSpec::root`].
    pub path: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub case_sensitivity: CaseSensitivity,
    pub ignore_hidden: bool,
}

impl ObserverSpec {
    /// Observed root: `path` resolved against `base_dir` unless absolute.
    pub fn root(&self, base_dir: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            base_dir.join(&self.path)
        }
    }

    /// Translate into an [`ObserverConfig`] rooted under `base_dir`.
    ///
    /// No filter is installed when nothing would be filtered out.
    pub fn to_observer_config(&self, base_dir: &Path) -> Result<ObserverConfig> {
        let root = self.root(base_dir);

        let mut filters: Vec<Arc<dyn FileFilter>> = Vec::new();
        if self.ignore_hidden {
            filters.push(Arc::new(VisibleFilter));
        }
        if !self.include.is_empty() || !self.exclude.is_empty() {
            filters.push(Arc::new(GlobProfileFilter::new(
                &root,
                self.include.clone(),
                self.exclude.clone(),
                self.case_sensitivity,
            )?));
        }

        let filter: Option<Arc<dyn FileFilter>> = match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Arc::new(AndFilter::new(filters))),
        };

        Ok(ObserverConfig {
            root,
            filter,
            case_sensitivity: self.case_sensitivity,
            comparator: None,
        })
    }
}
