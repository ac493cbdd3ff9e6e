// src/comparator.rs

//! Orderings over snapshot entries.
//!
//! The observer sorts each directory's children with an [`EntryComparator`]
//! and the diff engine matches old and new children with
//! [`EntryComparator::same_entry`]. Comparators used for observing must be
//! name-consistent: [`NameComparator`], [`PathComparator`], or
//! [`DirectoryFirstComparator`] / [`ReverseComparator`] wrapped around one of
//! those. [`SizeComparator`] and [`LastModifiedComparator`] are for presenting
//! snapshots.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

use crate::monitor::entry::FileEntry;
use crate::types::CaseSensitivity;

pub trait EntryComparator: Debug + Send + Sync {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering;

    /// Whether `a` and `b` denote the same entry across two snapshots.
    ///
    /// Defaults to comparing `Equal`. Wrappers that order by something other
    /// than identity (entry type, for one) defer to their inner comparator.
    fn same_entry(&self, a: &FileEntry, b: &FileEntry) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

impl<C: EntryComparator + ?Sized> EntryComparator for Arc<C> {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        (**self).compare(a, b)
    }

    fn same_entry(&self, a: &FileEntry, b: &FileEntry) -> bool {
        (**self).same_entry(a, b)
    }
}

impl<C: EntryComparator + ?Sized> EntryComparator for Box<C> {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        (**self).compare(a, b)
    }

    fn same_entry(&self, a: &FileEntry, b: &FileEntry) -> bool {
        (**self).same_entry(a, b)
    }
}

/// Order by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NameComparator {
    pub case: CaseSensitivity,
}

impl NameComparator {
    pub const SENSITIVE: NameComparator = NameComparator {
        case: CaseSensitivity::Sensitive,
    };
    pub const INSENSITIVE: NameComparator = NameComparator {
        case: CaseSensitivity::Insensitive,
    };

    pub fn new(case: CaseSensitivity) -> Self {
        Self { case }
    }
}

impl EntryComparator for NameComparator {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        self.case.compare(a.name(), b.name())
    }
}

/// Order by full path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathComparator {
    pub case: CaseSensitivity,
}

impl EntryComparator for PathComparator {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        self.case
            .compare(&a.path().to_string_lossy(), &b.path().to_string_lossy())
    }
}

/// Directories sort before files; ties fall through to `inner`.
///
/// Identity ignores the entry type, so a file replaced by a directory of the
/// same name is still one entry to the diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryFirstComparator<C> {
    pub inner: C,
}

impl<C: EntryComparator> EntryComparator for DirectoryFirstComparator<C> {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| self.inner.compare(a, b))
    }

    fn same_entry(&self, a: &FileEntry, b: &FileEntry) -> bool {
        self.inner.same_entry(a, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReverseComparator<C> {
    pub inner: C,
}

impl<C: EntryComparator> EntryComparator for ReverseComparator<C> {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        self.inner.compare(b, a)
    }

    fn same_entry(&self, a: &FileEntry, b: &FileEntry) -> bool {
        self.inner.same_entry(a, b)
    }
}

/// Smallest first. Directories count as length 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeComparator;

impl EntryComparator for SizeComparator {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        a.length().cmp(&b.length())
    }
}

/// Oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastModifiedComparator;

impl EntryComparator for LastModifiedComparator {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        a.last_modified().cmp(&b.last_modified())
    }
}

/// Applies each comparator in turn; the first non-`Equal` result wins.
#[derive(Debug, Clone, Default)]
pub struct CompositeComparator {
    parts: Vec<Arc<dyn EntryComparator>>,
}

impl CompositeComparator {
    pub fn new(parts: Vec<Arc<dyn EntryComparator>>) -> Self {
        Self { parts }
    }

    pub fn then(mut self, next: impl EntryComparator + 'static) -> Self {
        self.parts.push(Arc::new(next));
        self
    }
}

impl EntryComparator for CompositeComparator {
    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        self.parts
            .iter()
            .map(|c| c.compare(a, b))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

/// Stable sort of a slice of entries.
pub fn sort_entries(entries: &mut [Arc<FileEntry>], comparator: &dyn EntryComparator) {
    entries.sort_by(|a, b| comparator.compare(a, b));
}
