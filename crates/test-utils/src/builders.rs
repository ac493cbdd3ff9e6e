use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use pollwatch::config::{
    ConfigFile, DefaultSection, MonitorSection, ObserverSection, RawConfigFile,
};
use pollwatch::types::CaseSensitivity;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                monitor: MonitorSection::default(),
                default: DefaultSection::default(),
                observer: BTreeMap::new(),
            },
        }
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.config.monitor.interval = interval.to_string();
        self
    }

    pub fn with_observer(mut self, name: &str, observer: ObserverSection) -> Self {
        self.config.observer.insert(name.to_string(), observer);
        self
    }

    pub fn with_default_include(mut self, pattern: &str) -> Self {
        self.config.default.include.push(pattern.to_string());
        self
    }

    pub fn with_default_exclude(mut self, pattern: &str) -> Self {
        self.config.default.exclude.push(pattern.to_string());
        self
    }

    pub fn ignore_hidden(mut self, val: bool) -> Self {
        self.config.default.ignore_hidden = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ObserverSection`.
pub struct ObserverSectionBuilder {
    observer: ObserverSection,
}

impl ObserverSectionBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            observer: ObserverSection {
                path: path.to_string(),
                include: None,
                exclude: None,
                append_default_include: false,
                append_default_exclude: false,
                case_sensitivity: None,
                ignore_hidden: None,
            },
        }
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.observer
            .include
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.observer
            .exclude
            .get_or_insert_with(Vec::new)
            .push(pattern.to_string());
        self
    }

    pub fn append_default_include(mut self) -> Self {
        self.observer.append_default_include = true;
        self
    }

    pub fn append_default_exclude(mut self) -> Self {
        self.observer.append_default_exclude = true;
        self
    }

    pub fn case_sensitivity(mut self, case: CaseSensitivity) -> Self {
        self.observer.case_sensitivity = Some(case);
        self
    }

    pub fn ignore_hidden(mut self, val: bool) -> Self {
        self.observer.ignore_hidden = Some(val);
        self
    }

    pub fn build(self) -> ObserverSection {
        self.observer
    }
}

/// Write a minimal `Pollwatch.toml` into `dir` observing each `(name, path)`.
pub fn write_config(dir: &Path, interval: &str, observers: &[(&str, &str)]) -> std::path::PathBuf {
    let mut toml = String::new();
    let _ = writeln!(toml, "[monitor]\ninterval = \"{interval}\"\n");
    for (name, path) in observers {
        let _ = writeln!(toml, "[observer.{name}]\npath = \"{path}\"\n");
    }
    let config_path = dir.join("Pollwatch.toml");
    std::fs::write(&config_path, toml).expect("write Pollwatch.toml");
    config_path
}
