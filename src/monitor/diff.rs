// src/monitor/diff.rs

//! Comparing two snapshot trees.
//!
//! Both trees hold children sorted by the same comparator, so each directory
//! level is a two-pointer merge. Ordering of the produced events:
//!
//! - within a level, comparator order;
//! - a removed directory reports its descendants before itself;
//! - an added directory reports itself before its descendants;
//! - a surviving directory whose mtime changed reports `DirectoryChange`
//!   after the events of its children;
//! - an entry that switched between file and directory is reported as a
//!   deletion of the old entry followed by a creation of the new one, even
//!   when the comparator sorts the two versions apart.
//!
//! Old and new children are paired with [`EntryComparator::same_entry`].

use std::cmp::Ordering;
use std::sync::Arc;

use crate::comparator::EntryComparator;
use crate::monitor::entry::FileEntry;
use crate::monitor::event::{AlterationEvent, AlterationKind};

/// Compute the events that turn `previous` into `current`.
///
/// Both arguments are snapshots of the same root. The root's own mtime is
/// not reported: any child being added or removed bumps it.
pub fn diff(
    previous: &Arc<FileEntry>,
    current: &Arc<FileEntry>,
    comparator: &dyn EntryComparator,
) -> Vec<AlterationEvent> {
    let mut differ = Differ {
        comparator,
        events: Vec::new(),
    };

    match (previous.exists(), current.exists()) {
        (false, false) => {}
        (false, true) => differ.created(current),
        (true, false) => differ.deleted(previous),
        (true, true) => {
            if previous.is_directory() != current.is_directory() {
                differ.deleted(previous);
                differ.created(current);
            } else if current.is_directory() {
                differ.children(previous.children(), current.children());
            } else {
                differ.file_matched(previous, current);
            }
        }
    }

    differ.events
}

#[derive(Clone, Copy)]
enum Step<'e> {
    Deleted(&'e Arc<FileEntry>),
    Created(&'e Arc<FileEntry>),
    Matched(&'e Arc<FileEntry>, &'e Arc<FileEntry>),
}

/// Two-pointer merge of one directory level, both sides sorted by
/// `comparator`.
fn merge<'e>(
    comparator: &dyn EntryComparator,
    previous: &'e [Arc<FileEntry>],
    current: &'e [Arc<FileEntry>],
) -> Vec<Step<'e>> {
    let mut steps = Vec::with_capacity(previous.len().max(current.len()));
    let (mut i, mut j) = (0, 0);

    while i < previous.len() || j < current.len() {
        let order = match (previous.get(i), current.get(j)) {
            (Some(p), Some(c)) if comparator.same_entry(p, c) => Ordering::Equal,
            (Some(p), Some(c)) => comparator.compare(p, c),
            (Some(_), None) => Ordering::Less,
            (None, _) => Ordering::Greater,
        };

        match order {
            Ordering::Less => {
                steps.push(Step::Deleted(&previous[i]));
                i += 1;
            }
            Ordering::Greater => {
                steps.push(Step::Created(&current[j]));
                j += 1;
            }
            Ordering::Equal => {
                steps.push(Step::Matched(&previous[i], &current[j]));
                i += 1;
                j += 1;
            }
        }
    }
    steps
}

struct Differ<'a> {
    comparator: &'a dyn EntryComparator,
    events: Vec<AlterationEvent>,
}

impl Differ<'_> {
    fn emit(&mut self, kind: AlterationKind, entry: &Arc<FileEntry>) {
        self.events.push(AlterationEvent::new(kind, Arc::clone(entry)));
    }

    fn children(&mut self, previous: &[Arc<FileEntry>], current: &[Arc<FileEntry>]) {
        let steps = merge(self.comparator, previous, current);
        let mut consumed = vec![false; steps.len()];

        for (i, step) in steps.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            match *step {
                Step::Matched(p, c) => self.matched(p, c),
                Step::Deleted(p) => match self.partner(&steps, &consumed, i, p) {
                    Some((k, c)) => {
                        consumed[k] = true;
                        self.deleted(p);
                        self.created(c);
                    }
                    None => self.deleted(p),
                },
                Step::Created(c) => match self.partner(&steps, &consumed, i, c) {
                    Some((k, p)) => {
                        consumed[k] = true;
                        self.deleted(p);
                        self.created(c);
                    }
                    None => self.created(c),
                },
            }
        }
    }

    /// A later unmatched step of the opposite kind denoting the same entry.
    ///
    /// Only comparators whose ordering splits identity (directory-first)
    /// leave such pairs; they are type changes.
    fn partner<'e>(
        &self,
        steps: &[Step<'e>],
        consumed: &[bool],
        from: usize,
        entry: &FileEntry,
    ) -> Option<(usize, &'e Arc<FileEntry>)> {
        let want_created = matches!(steps[from], Step::Deleted(_));
        steps
            .iter()
            .enumerate()
            .skip(from + 1)
            .filter(|(k, _)| !consumed[*k])
            .find_map(|(k, step)| match (*step, want_created) {
                (Step::Created(other), true) | (Step::Deleted(other), false)
                    if other.is_directory() != entry.is_directory()
                        && self.comparator.same_entry(entry, other) =>
                {
                    Some((k, other))
                }
                _ => None,
            })
    }

    fn matched(&mut self, previous: &Arc<FileEntry>, current: &Arc<FileEntry>) {
        match (previous.is_directory(), current.is_directory()) {
            (true, true) => {
                self.children(previous.children(), current.children());
                if previous.last_modified() != current.last_modified() {
                    self.emit(AlterationKind::DirectoryChange, current);
                }
            }
            (false, false) => self.file_matched(previous, current),
            _ => {
                self.deleted(previous);
                self.created(current);
            }
        }
    }

    fn file_matched(&mut self, previous: &Arc<FileEntry>, current: &Arc<FileEntry>) {
        if previous.last_modified() != current.last_modified()
            || previous.length() != current.length()
        {
            self.emit(AlterationKind::FileChange, current);
        }
    }

    fn created(&mut self, entry: &Arc<FileEntry>) {
        if entry.is_directory() {
            self.emit(AlterationKind::DirectoryCreate, entry);
            for child in entry.children() {
                self.created(child);
            }
        } else {
            self.emit(AlterationKind::FileCreate, entry);
        }
    }

    fn deleted(&mut self, entry: &Arc<FileEntry>) {
        if entry.is_directory() {
            for child in entry.children() {
                self.deleted(child);
            }
            self.emit(AlterationKind::DirectoryDelete, entry);
        } else {
            self.emit(AlterationKind::FileDelete, entry);
        }
    }
}
