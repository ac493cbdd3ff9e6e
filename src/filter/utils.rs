// src/filter/utils.rs

//! Applying filters to loose path lists, and decorators for common cases.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{
    AndFilter, DirectoryFilter, FileFilter, FileFilterExt, FileTypeFilter, NameFilter, SizeFilter,
    and_filter,
};
use crate::fs::FileSystem;

/// Paths the filter accepts, in input order.
///
/// Each path is stat'ed through `fs`; paths that cannot be stat'ed are
/// dropped.
pub fn filter_list<I, P>(filter: &dyn FileFilter, fs: &dyn FileSystem, paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match fs.metadata(path) {
                Ok(attrs) => filter.accept(path, &attrs).then(|| path.to_path_buf()),
                Err(err) => {
                    debug!(path = ?path, error = %err, "cannot stat path; not filtered in");
                    None
                }
            }
        })
        .collect()
}

/// Like [`filter_list`], deduplicated and sorted.
pub fn filter_set<I, P>(filter: &dyn FileFilter, fs: &dyn FileSystem, paths: I) -> BTreeSet<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    filter_list(filter, fs, paths).into_iter().collect()
}

/// Rejects `CVS` directories; everything else goes to `filter`.
pub fn make_cvs_aware(filter: Option<Arc<dyn FileFilter>>) -> Arc<dyn FileFilter> {
    skip_directory(filter, "CVS")
}

/// Rejects `.svn` directories; everything else goes to `filter`.
pub fn make_svn_aware(filter: Option<Arc<dyn FileFilter>>) -> Arc<dyn FileFilter> {
    skip_directory(filter, ".svn")
}

/// Restricts `filter` to directories.
pub fn make_directory_only(filter: Option<Arc<dyn FileFilter>>) -> Arc<dyn FileFilter> {
    restrict(Arc::new(DirectoryFilter), filter)
}

/// Restricts `filter` to non-directories.
pub fn make_file_only(filter: Option<Arc<dyn FileFilter>>) -> Arc<dyn FileFilter> {
    restrict(Arc::new(FileTypeFilter), filter)
}

/// Accepts lengths in `min..=max`.
pub fn size_range(min: u64, max: u64) -> AndFilter {
    SizeFilter::at_least(min).and(SizeFilter::smaller_than(max.saturating_add(1)))
}

fn skip_directory(filter: Option<Arc<dyn FileFilter>>, name: &str) -> Arc<dyn FileFilter> {
    let skip: Arc<dyn FileFilter> = Arc::new(DirectoryFilter.and(NameFilter::new([name])).negate());
    restrict(skip, filter)
}

fn restrict(base: Arc<dyn FileFilter>, filter: Option<Arc<dyn FileFilter>>) -> Arc<dyn FileFilter> {
    match filter {
        Some(filter) => and_filter([base, filter]),
        None => base,
    }
}
