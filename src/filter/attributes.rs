// src/filter/attributes.rs

//! Filters over stat attributes (type, visibility, age, size).

use std::path::Path;
use std::time::SystemTime;

use super::{FileFilter, file_name};
use crate::fs::EntryAttributes;

/// Accepts directories only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryFilter;

impl FileFilter for DirectoryFilter {
    fn accept(&self, _path: &Path, attrs: &EntryAttributes) -> bool {
        attrs.is_dir
    }
}

/// Accepts anything that is not a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileTypeFilter;

impl FileFilter for FileTypeFilter {
    fn accept(&self, _path: &Path, attrs: &EntryAttributes) -> bool {
        attrs.is_file()
    }
}

/// Accepts dot-files and dot-directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HiddenFilter;

impl FileFilter for HiddenFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        file_name(path).starts_with('.')
    }
}

/// Inverse of [`HiddenFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleFilter;

impl FileFilter for VisibleFilter {
    fn accept(&self, path: &Path, _attrs: &EntryAttributes) -> bool {
        !file_name(path).starts_with('.')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanWriteFilter;

impl FileFilter for CanWriteFilter {
    fn accept(&self, _path: &Path, attrs: &EntryAttributes) -> bool {
        !attrs.readonly
    }
}

/// Compares modification times against a fixed cutoff.
///
/// An entry is "newer" when its mtime is strictly after the cutoff. With
/// `accept_older` the filter accepts entries that are not newer (so an entry
/// modified exactly at the cutoff counts as old); otherwise it accepts only
/// newer entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeFilter {
    cutoff: SystemTime,
    accept_older: bool,
}

impl AgeFilter {
    /// Accepts entries modified at or before `cutoff`.
    pub fn older_than(cutoff: SystemTime) -> Self {
        Self {
            cutoff,
            accept_older: true,
        }
    }

    /// Accepts entries modified after `cutoff`.
    pub fn newer_than(cutoff: SystemTime) -> Self {
        Self {
            cutoff,
            accept_older: false,
        }
    }
}

impl FileFilter for AgeFilter {
    fn accept(&self, _path: &Path, attrs: &EntryAttributes) -> bool {
        let newer = attrs.modified > self.cutoff;
        self.accept_older != newer
    }
}

/// Compares lengths against a threshold.
///
/// With `accept_larger` the filter accepts entries of at least `threshold`
/// bytes, otherwise entries strictly smaller than it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFilter {
    threshold: u64,
    accept_larger: bool,
}

impl SizeFilter {
    pub fn at_least(threshold: u64) -> Self {
        Self {
            threshold,
            accept_larger: true,
        }
    }

    pub fn smaller_than(threshold: u64) -> Self {
        Self {
            threshold,
            accept_larger: false,
        }
    }
}

impl FileFilter for SizeFilter {
    fn accept(&self, _path: &Path, attrs: &EntryAttributes) -> bool {
        let smaller = attrs.len < self.threshold;
        self.accept_larger != smaller
    }
}
