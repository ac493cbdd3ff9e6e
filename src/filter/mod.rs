// src/filter/mod.rs

//! Predicates deciding which entries take part in a snapshot.
//!
//! Every filter is an immutable value: it holds configuration only (a cutoff
//! time, a name pattern, ...) and `accept` is a pure function of its inputs,
//! so one filter can be shared between observers and threads behind an `Arc`.
//!
//! Filters compose with [`FileFilterExt::and`], [`FileFilterExt::or`] and
//! [`FileFilterExt::negate`], or the free functions [`and_filter`],
//! [`or_filter`] and [`not_filter`] for dynamic lists.

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::fs::EntryAttributes;

pub mod attributes;
pub mod glob;
pub mod logic;
pub mod magic;
pub mod name;
pub mod utils;

pub use attributes::{
    AgeFilter, CanWriteFilter, DirectoryFilter, FileTypeFilter, HiddenFilter, SizeFilter,
    VisibleFilter,
};
pub use glob::{GlobProfileFilter, build_globset};
pub use logic::{AndFilter, NotFilter, OrFilter, and_filter, not_filter, or_filter};
pub use magic::MagicNumberFilter;
pub use name::{NameFilter, PrefixFilter, RegexFilter, SuffixFilter, WildcardFilter};
pub use utils::{
    filter_list, filter_set, make_cvs_aware, make_directory_only, make_file_only, make_svn_aware,
    size_range,
};

/// Decides whether an entry is part of the observed tree.
pub trait FileFilter: fmt::Debug + Send + Sync {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool;
}

impl<F: FileFilter + ?Sized> FileFilter for Arc<F> {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        (**self).accept(path, attrs)
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        (**self).accept(path, attrs)
    }
}

/// Builder-style combinators for any concrete filter.
pub trait FileFilterExt: FileFilter + Sized + 'static {
    fn and<F: FileFilter + 'static>(self, other: F) -> AndFilter {
        AndFilter::new(vec![Arc::new(self), Arc::new(other)])
    }

    fn or<F: FileFilter + 'static>(self, other: F) -> OrFilter {
        OrFilter::new(vec![Arc::new(self), Arc::new(other)])
    }

    fn negate(self) -> NotFilter {
        NotFilter::new(Arc::new(self))
    }
}

impl<F: FileFilter + 'static> FileFilterExt for F {}

/// Accepts everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrueFilter;

impl TrueFilter {
    pub const INSTANCE: TrueFilter = TrueFilter;
}

impl FileFilter for TrueFilter {
    fn accept(&self, _path: &Path, _attrs: &EntryAttributes) -> bool {
        true
    }
}

/// Accepts nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FalseFilter;

impl FalseFilter {
    pub const INSTANCE: FalseFilter = FalseFilter;
}

impl FileFilter for FalseFilter {
    fn accept(&self, _path: &Path, _attrs: &EntryAttributes) -> bool {
        false
    }
}

/// Delegates to a closure.
pub struct FnFilter<F> {
    label: &'static str,
    predicate: F,
}

impl<F> FnFilter<F>
where
    F: Fn(&Path, &EntryAttributes) -> bool + Send + Sync,
{
    pub fn new(label: &'static str, predicate: F) -> Self {
        Self { label, predicate }
    }
}

impl<F> fmt::Debug for FnFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnFilter").field(&self.label).finish()
    }
}

impl<F> FileFilter for FnFilter<F>
where
    F: Fn(&Path, &EntryAttributes) -> bool + Send + Sync,
{
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        (self.predicate)(path, attrs)
    }
}

/// Last path component as text, or the whole path when there is none.
pub(crate) fn file_name(path: &Path) -> Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}
