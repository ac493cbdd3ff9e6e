// src/filter/name.rs

//! Filters over the entry's file name.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use regex::{Regex, RegexBuilder};

use super::{FileFilter, file_name};
use crate::errors::Result;
use crate::fs::EntryAttributes;
use crate::types::CaseSensitivity;

fn collect_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Accepts entries whose name equals one of `names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    names: Vec<String>,
    case: CaseSensitivity,
}

impl NameFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: collect_strings(names),
            case: CaseSensitivity::Sensitive,
        }
    }

    pub fn with_case(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }
}

impl FileFilter for NameFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        let name = file_name(path);
        self.names.iter().any(|n| self.case.equals(&name, n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixFilter {
    prefixes: Vec<String>,
    case: CaseSensitivity,
}

impl PrefixFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: collect_strings(prefixes),
            case: CaseSensitivity::Sensitive,
        }
    }

    pub fn with_case(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }
}

impl FileFilter for PrefixFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        let name = file_name(path);
        self.prefixes.iter().any(|p| self.case.starts_with(&name, p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixFilter {
    suffixes: Vec<String>,
    case: CaseSensitivity,
}

impl SuffixFilter {
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: collect_strings(suffixes),
            case: CaseSensitivity::Sensitive,
        }
    }

    pub fn with_case(mut self, case: CaseSensitivity) -> Self {
        self.case = case;
        self
    }
}

impl FileFilter for SuffixFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        let name = file_name(path);
        self.suffixes.iter().any(|s| self.case.ends_with(&name, s))
    }
}

/// Shell-style wildcards (`*.rs`, `data-??.csv`) matched against the name.
#[derive(Debug, Clone)]
pub struct WildcardFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl WildcardFilter {
    pub fn new<I, S>(patterns: I, case: CaseSensitivity) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = collect_strings(patterns);
        let mut builder = GlobSetBuilder::new();
        for pat in &patterns {
            let glob = GlobBuilder::new(pat)
                .case_insensitive(!case.is_case_sensitive())
                .literal_separator(true)
                .build()?;
            builder.add(glob);
        }
        Ok(Self {
            patterns,
            set: builder.build()?,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl FileFilter for WildcardFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        self.set.is_match(file_name(path).as_ref())
    }
}

/// Regular expression searched in the name (anchor it for full matches).
#[derive(Debug, Clone)]
pub struct RegexFilter {
    regex: Regex,
}

impl RegexFilter {
    pub fn new(pattern: &str, case: CaseSensitivity) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case.is_case_sensitive())
            .build()?;
        Ok(Self { regex })
    }
}

impl FileFilter for RegexFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        self.regex.is_match(&file_name(path))
    }
}
