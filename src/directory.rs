//! Filesystem access for a single, non-recursive directory.
//!
//! [`Directory`] takes the snapshot a run iterates over and implements
//! [`RenameOps`] so the planner can rename inside it.

use crate::planner::RenameOps;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while opening or listing the target directory.
#[derive(Debug)]
pub enum DirectoryError {
    /// The path does not exist.
    NotFound(PathBuf),
    /// The path exists but is not a directory.
    NotADirectory(PathBuf),
    /// Listing the directory failed.
    ReadFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Directory not found: {}", path.display()),
            Self::NotADirectory(path) => write!(f, "Not a directory: {}", path.display()),
            Self::ReadFailed { path, source } => {
                write!(f, "Error reading directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for DirectoryError {}

/// A directory whose files are renamed in place.
#[derive(Debug, Clone)]
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    /// Opens `path`, checking that it is an existing directory.
    pub fn open(path: &Path) -> Result<Self, DirectoryError> {
        if !path.exists() {
            return Err(DirectoryError::NotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(DirectoryError::NotADirectory(path.to_path_buf()));
        }
        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Lists the files in the directory, sorted by name.
    ///
    /// Symlinks are listed unless they point at a directory, so dangling
    /// links are both renamable and visible to collision checks. Names that
    /// are not valid UTF-8 are left out since they cannot be normalized.
    pub fn snapshot(&self) -> Result<Vec<String>, DirectoryError> {
        let entries = fs::read_dir(&self.root).map_err(|source| DirectoryError::ReadFailed {
            path: self.root.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| {
                entry.file_type().is_ok_and(|file_type| {
                    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
                })
            })
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        Ok(names)
    }
}

impl RenameOps for Directory {
    /// Checks the entry itself, so a dangling symlink still counts.
    fn exists(&self, name: &str) -> bool {
        fs::symlink_metadata(self.root.join(name)).is_ok()
    }

    fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(self.root.join(from), self.root.join(to))
    }

    /// Example: `Track.ogg` becomes `.Track.ogg.tracknorm-0.tmp`
    fn temp_name(&self, name: &str) -> String {
        let mut n = 0;
        loop {
            let candidate = format!(".{}.tracknorm-{}.tmp", name, n);
            if !self.exists(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
