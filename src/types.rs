// src/types.rs

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How file names are compared when sorting snapshots and matching filters.
///
/// - `Sensitive`: byte-wise comparison.
/// - `Insensitive`: comparison after Unicode lower-casing.
/// - `System`: whatever the host filesystem usually does (insensitive on
///   Windows, sensitive everywhere else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
    #[default]
    System,
}

impl CaseSensitivity {
    pub fn is_case_sensitive(self) -> bool {
        match self {
            CaseSensitivity::Sensitive => true,
            CaseSensitivity::Insensitive => false,
            CaseSensitivity::System => !cfg!(windows),
        }
    }

    /// Compare two names under this sensitivity.
    ///
    /// Names that only differ in case compare `Equal` when insensitive.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        if self.is_case_sensitive() {
            a.cmp(b)
        } else {
            a.to_lowercase().cmp(&b.to_lowercase())
        }
    }

    pub fn equals(self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    pub fn starts_with(self, name: &str, prefix: &str) -> bool {
        if self.is_case_sensitive() {
            name.starts_with(prefix)
        } else {
            name.to_lowercase().starts_with(&prefix.to_lowercase())
        }
    }

    pub fn ends_with(self, name: &str, suffix: &str) -> bool {
        if self.is_case_sensitive() {
            name.ends_with(suffix)
        } else {
            name.to_lowercase().ends_with(&suffix.to_lowercase())
        }
    }
}

impl fmt::Display for CaseSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseSensitivity::Sensitive => "sensitive",
            CaseSensitivity::Insensitive => "insensitive",
            CaseSensitivity::System => "system",
        };
        f.write_str(s)
    }
}

impl FromStr for CaseSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sensitive" => Ok(CaseSensitivity::Sensitive),
            "insensitive" => Ok(CaseSensitivity::Insensitive),
            "system" => Ok(CaseSensitivity::System),
            other => Err(format!(
                "invalid case_sensitivity: {other} (expected \"sensitive\", \"insensitive\" or \"system\")"
            )),
        }
    }
}
