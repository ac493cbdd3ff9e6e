// src/monitor/snapshot.rs

//! Capturing a filtered, sorted [`FileEntry`] tree from the filesystem.

use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::comparator::EntryComparator;
use crate::errors::{PollwatchError, Result};
use crate::filter::FileFilter;
use crate::fs::FileSystem;
use crate::monitor::entry::FileEntry;

/// Capture the current state of `root`.
///
/// - A missing root yields a non-existent entry rather than an error.
/// - Failing to stat the root, or to list the root directory, aborts the
///   whole capture.
/// - Sub-directories that cannot be listed are captured without children.
/// - Entries below the root are not followed through symlinks: a link is
///   captured as a leaf describing the link itself.
/// - The filter applies to every entry below the root, never to the root.
pub fn capture(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &dyn FileFilter,
    comparator: &dyn EntryComparator,
) -> Result<Arc<FileEntry>> {
    let attrs = match fs.metadata(root) {
        Ok(attrs) => attrs,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(root = ?root, "observed root does not exist");
            return Ok(Arc::new(FileEntry::missing(root)));
        }
        Err(source) => {
            return Err(PollwatchError::Capture {
                path: root.to_path_buf(),
                source,
            });
        }
    };

    if !attrs.is_dir {
        return Ok(Arc::new(FileEntry::from_attributes(root, &attrs, Vec::new())));
    }

    let listing = fs.read_dir(root).map_err(|source| PollwatchError::Capture {
        path: root.to_path_buf(),
        source,
    })?;

    let walker = Walker {
        fs,
        filter,
        comparator,
    };
    let children = walker.children_of(listing);
    Ok(Arc::new(FileEntry::from_attributes(root, &attrs, children)))
}

struct Walker<'a> {
    fs: &'a dyn FileSystem,
    filter: &'a dyn FileFilter,
    comparator: &'a dyn EntryComparator,
}

impl Walker<'_> {
    fn children_of(&self, listing: Vec<PathBuf>) -> Vec<Arc<FileEntry>> {
        let mut children = Vec::with_capacity(listing.len());

        for path in listing {
            let attrs = match self.fs.symlink_metadata(&path) {
                Ok(attrs) => attrs,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(path = ?path, "entry vanished during capture");
                    continue;
                }
                Err(err) => {
                    warn!(path = ?path, error = %err, "cannot stat entry; skipping");
                    continue;
                }
            };

            if !self.filter.accept(&path, &attrs) {
                continue;
            }

            let grandchildren = if attrs.is_dir {
                self.directory_children(&path)
            } else {
                Vec::new()
            };
            children.push(Arc::new(FileEntry::from_attributes(
                path,
                &attrs,
                grandchildren,
            )));
        }

        // Byte order breaks ties so the surviving duplicate does not depend
        // on listing order.
        children.sort_by(|a, b| {
            self.comparator
                .compare(a, b)
                .then_with(|| a.name().cmp(b.name()))
        });
        children.dedup_by(|later, earlier| {
            self.comparator.compare(&**earlier, &**later) == Ordering::Equal
        });
        children
    }

    fn directory_children(&self, dir: &Path) -> Vec<Arc<FileEntry>> {
        match self.fs.read_dir(dir) {
            Ok(listing) => self.children_of(listing),
            Err(err) => {
                warn!(
                    dir = ?dir,
                    error = %err,
                    "cannot list directory; treating it as empty for this cycle"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::NameComparator;
    use crate::filter::{DirectoryFilter, FileFilterExt, SuffixFilter, TrueFilter};
    use crate::fs::mock::{MockFileSystem, mtime};

    fn names(entry: &FileEntry) -> Vec<String> {
        entry
            .descendants()
            .map(|e| {
                e.path()
                    .strip_prefix("/w")
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    fn sample() -> MockFileSystem {
        let fs = MockFileSystem::new();
        fs.add_dir("/w", mtime(1));
        fs.add_file("/w/zeta.java", 1, mtime(1));
        fs.add_file("/w/b/two.txt", 2, mtime(1));
        fs.add_file("/w/b/one.java", 3, mtime(1));
        fs.add_file("/w/Alpha.java", 4, mtime(1));
        fs
    }

    #[test]
    fn captures_sorted_tree() {
        let fs = sample();
        let root = capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::SENSITIVE).unwrap();

        assert!(root.exists());
        assert!(root.is_directory());
        assert_eq!(
            names(&root),
            vec!["Alpha.java", "b", "b/one.java", "b/two.txt", "zeta.java"]
        );
    }

    #[test]
    fn filter_prunes_entries() {
        let fs = sample();
        let filter = DirectoryFilter.or(SuffixFilter::new([".java"]));
        let root = capture(&fs, Path::new("/w"), &filter, &NameComparator::SENSITIVE).unwrap();
        assert_eq!(names(&root), vec!["Alpha.java", "b", "b/one.java", "zeta.java"]);
    }

    #[test]
    fn missing_root_is_not_an_error() {
        let fs = MockFileSystem::new();
        let root = capture(&fs, Path::new("/nope"), &TrueFilter, &NameComparator::SENSITIVE).unwrap();
        assert!(!root.exists());
        assert_eq!(root.child_count(), 0);
    }

    #[test]
    fn unreadable_root_aborts_capture() {
        let fs = sample();
        fs.fail_listing("/w");
        let err = capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::SENSITIVE).unwrap_err();
        assert!(matches!(err, PollwatchError::Capture { .. }));

        fs.heal("/w");
        fs.fail_metadata("/w");
        assert!(capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::SENSITIVE).is_err());
    }

    #[test]
    fn unreadable_subdirectory_is_empty() {
        let fs = sample();
        fs.fail_listing("/w/b");
        let root = capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::SENSITIVE).unwrap();
        assert_eq!(names(&root), vec!["Alpha.java", "b", "zeta.java"]);
    }

    #[test]
    fn unstatable_child_is_skipped() {
        let fs = sample();
        fs.fail_metadata("/w/zeta.java");
        let root = capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::SENSITIVE).unwrap();
        assert!(!names(&root).contains(&"zeta.java".to_string()));
    }

    #[test]
    fn insensitive_duplicates_collapse_regardless_of_listing_order() {
        for names in [["readme", "README"], ["README", "readme"]] {
            let fs = MockFileSystem::new();
            fs.add_file(format!("/w/{}", names[0]), 1, mtime(1));
            fs.add_file(format!("/w/{}", names[1]), 2, mtime(1));
            let root =
                capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::INSENSITIVE).unwrap();
            assert_eq!(root.child_count(), 1);
            assert_eq!(root.children()[0].name(), "README");
        }
    }

    #[test]
    fn symlinks_are_leaves() {
        let fs = sample();
        fs.add_symlink("/w/b/parent", "..", mtime(4));
        fs.add_symlink("/w/self", ".", mtime(4));

        let root = capture(&fs, Path::new("/w"), &TrueFilter, &NameComparator::SENSITIVE).unwrap();
        assert_eq!(
            names(&root),
            vec!["Alpha.java", "b", "b/one.java", "b/parent", "b/two.txt", "self", "zeta.java"]
        );
        let link = root.children().iter().find(|e| e.name() == "self").unwrap();
        assert!(link.is_file());
        assert_eq!(link.child_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn real_self_links_do_not_recurse() {
        use crate::fs::RealFileSystem;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"abc").unwrap();
        std::os::unix::fs::symlink(".", dir.path().join("l1")).unwrap();
        std::os::unix::fs::symlink(".", dir.path().join("l2")).unwrap();

        let root = capture(
            &RealFileSystem,
            dir.path(),
            &TrueFilter,
            &NameComparator::SENSITIVE,
        )
        .unwrap();
        let names: Vec<_> = root.descendants().map(|e| e.name().to_string()).collect();
        assert_eq!(names, vec!["a.txt", "l1", "l2"]);
    }

    #[test]
    fn single_file_root() {
        let fs = sample();
        let root = capture(
            &fs,
            Path::new("/w/zeta.java"),
            &TrueFilter,
            &NameComparator::SENSITIVE,
        )
        .unwrap();
        assert!(root.is_file());
        assert_eq!(root.length(), 1);
    }
}
