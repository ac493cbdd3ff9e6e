// src/filter/magic.rs

//! Filtering on a file's leading bytes.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use super::FileFilter;
use crate::errors::{PollwatchError, Result};
use crate::fs::EntryAttributes;

/// Accepts regular files holding `signature` at byte `offset`.
///
/// Directories, symlinks, files too short to hold the signature and files
/// that cannot be read are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicNumberFilter {
    signature: Vec<u8>,
    offset: u64,
}

impl MagicNumberFilter {
    pub fn new(signature: impl Into<Vec<u8>>) -> Result<Self> {
        Self::at_offset(signature, 0)
    }

    pub fn at_offset(signature: impl Into<Vec<u8>>, offset: u64) -> Result<Self> {
        let signature = signature.into();
        if signature.is_empty() {
            return Err(PollwatchError::ConfigError(
                "magic number must contain at least one byte".to_string(),
            ));
        }
        Ok(Self { signature, offset })
    }

    fn read_matches(&self, path: &Path) -> io::Result<bool> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut found = vec![0; self.signature.len()];
        file.read_exact(&mut found)?;
        Ok(found == self.signature)
    }
}

impl FileFilter for MagicNumberFilter {
    fn accept(&self, path: &Path, attrs: &EntryAttributes) -> bool {
        let needed = self.offset.saturating_add(self.signature.len() as u64);
        if attrs.is_dir || attrs.is_symlink || attrs.len < needed {
            return false;
        }
        self.read_matches(path).unwrap_or(false)
    }
}
