// src/report.rs

//! Plain-text reports printed by `--dry-run` and `--snapshot`.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use crate::cli::SortKey;
use crate::comparator::{
    CompositeComparator, DirectoryFirstComparator, EntryComparator, LastModifiedComparator,
    NameComparator, ReverseComparator, SizeComparator, sort_entries,
};
use crate::config::ConfigFile;
use crate::monitor::FileEntry;
use crate::types::CaseSensitivity;

/// Comparator for presenting a snapshot. Ties on size or mtime fall back to
/// the name; `dirs_first` keeps directories on top even when reversed.
pub fn snapshot_comparator(
    key: SortKey,
    reverse: bool,
    dirs_first: bool,
    case: CaseSensitivity,
) -> Arc<dyn EntryComparator> {
    let by_name = NameComparator::new(case);
    let mut comparator: Arc<dyn EntryComparator> = match key {
        SortKey::Name => Arc::new(by_name),
        SortKey::Size => Arc::new(CompositeComparator::default().then(SizeComparator).then(by_name)),
        SortKey::Modified => Arc::new(
            CompositeComparator::default()
                .then(LastModifiedComparator)
                .then(by_name),
        ),
    };
    if reverse {
        comparator = Arc::new(ReverseComparator { inner: comparator });
    }
    if dirs_first {
        comparator = Arc::new(DirectoryFirstComparator { inner: comparator });
    }
    comparator
}

/// Indented tree, one entry per line. Directories end with `/`, files show
/// their length.
pub fn render_snapshot(root: &FileEntry, comparator: &dyn EntryComparator) -> String {
    let mut out = String::new();
    if !root.exists() {
        let _ = writeln!(out, "{} (missing)", root.path().display());
        return out;
    }
    if root.is_directory() {
        let _ = writeln!(out, "{}/", root.path().display());
    } else {
        let _ = writeln!(out, "{} ({} bytes)", root.path().display(), root.length());
    }
    render_children(root, comparator, 1, &mut out);
    out
}

fn render_children(dir: &FileEntry, comparator: &dyn EntryComparator, depth: usize, out: &mut String) {
    let mut children = dir.children().to_vec();
    sort_entries(&mut children, comparator);

    for child in &children {
        let indent = "  ".repeat(depth);
        if child.is_directory() {
            let _ = writeln!(out, "{indent}{}/", child.name());
            render_children(child, comparator, depth + 1, out);
        } else {
            let _ = writeln!(out, "{indent}{} ({} bytes)", child.name(), child.length());
        }
    }
}

/// Resolved observers, as the monitor would run them.
pub fn render_dry_run(cfg: &ConfigFile, base_dir: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "pollwatch dry-run");
    let _ = writeln!(out, "  monitor.interval = {:?}", cfg.interval);
    let _ = writeln!(out);
    let _ = writeln!(out, "observers ({}):", cfg.observers.len());

    for spec in &cfg.observers {
        let _ = writeln!(out, "  - {}", spec.name);
        let _ = writeln!(out, "      root: {}", spec.root(base_dir).display());
        if !spec.include.is_empty() {
            let _ = writeln!(out, "      include: {:?}", spec.include);
        }
        if !spec.exclude.is_empty() {
            let _ = writeln!(out, "      exclude: {:?}", spec.exclude);
        }
        let _ = writeln!(out, "      case_sensitivity: {}", spec.case_sensitivity);
        if spec.ignore_hidden {
            let _ = writeln!(out, "      ignore_hidden: true");
        }
    }
    out
}
