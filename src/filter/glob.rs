// src/filter/glob.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::FileFilter;
use crate::errors::{PollwatchError, Result};
use crate::fs::EntryAttributes;
use crate::types::CaseSensitivity;

/// Compiled include/exclude glob patterns, evaluated relative to a root.
///
/// The snapshot walker passes absolute paths; they are relativized against
/// `root` (e.g. `"src/main.rs"`) before matching.
///
/// - Files are accepted when they match `include` (or `include` is empty) and
///   do not match `exclude`.
/// - Directories ignore `include` so the walk can still descend into them;
///   they are pruned only when their own relative path matches `exclude`
///   (use `"**/target"` rather than `"**/target/**"` to prune a whole tree).
#[derive(Clone)]
pub struct GlobProfileFilter {
    root: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for GlobProfileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobProfileFilter")
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

impl GlobProfileFilter {
    pub fn new(
        root: impl Into<PathBuf>,
        include: Vec<String>,
        exclude: Vec<String>,
        case: CaseSensitivity,
    ) -> Result<Self> {
        let include_set = if include.is_empty() {
            None
        } else {
            Some(build_globset(&include, case)?)
        };
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(&exclude, case)?)
        };

        Ok(Self {
            root: root.into(),
            include,
            exclude,
            include_set,
            exclude_set,
        })
    }

    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Returns true if a file at the given root-relative path is observed.
    pub fn matches(&self, rel_path: &str) -> bool {
        if let Some(include) = &self.include_set {
            if !include.is_match(rel_path) {
                return false;
            }
        }
        !self.is_excluded(rel_path)
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|exclude| exclude.is_match(rel_path))
    }
}

impl FileFilter for GlobProfileFilter {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        let Some(rel) = relative_str(&self.root, path) else {
            return false;
        };
        if attrs.is_dir {
            !self.is_excluded(&rel)
        } else {
            self.matches(&rel)
        }
    }
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String], case: CaseSensitivity) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat)
            .case_insensitive(!case.is_case_sensitive())
            .build()
            .map_err(|e| PollwatchError::Pattern(format!("invalid glob pattern {pat}: {e}")))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root`.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
