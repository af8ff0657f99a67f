//! Rename planning and execution.
//!
//! The planner walks a directory snapshot, normalizes every matching audio
//! file, resolves collisions against the batch and the filesystem, and returns
//! a [`RenamePlan`]. Applying the plan goes through the [`RenameOps`] trait so
//! the same logic runs against a real directory or an in-memory fake.

use crate::config::CompiledFilters;
use crate::normalizer::normalize;
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Filesystem operations the planner needs when applying a plan.
///
/// Names are plain filenames relative to the directory being processed.
pub trait RenameOps {
    /// Returns true if an entry with this name exists right now.
    fn exists(&self, name: &str) -> bool;

    /// Renames `from` to `to` within the directory.
    fn rename(&mut self, from: &str, to: &str) -> io::Result<()>;

    /// Returns a name derived from `name` that does not exist yet.
    fn temp_name(&self, name: &str) -> String;
}

/// How case-only renames (`Track.ogg` -> `track.ogg`) are carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseRenameStrategy {
    /// Rename straight to the target. Correct on case-sensitive filesystems.
    Direct,
    /// Rename to a temporary name first, then to the target. Needed on
    /// case-insensitive but case-preserving volumes, harmless elsewhere.
    #[default]
    TwoStep,
}

impl CaseRenameStrategy {
    /// Picks the strategy from the filesystem capability flag.
    pub fn for_filesystem(case_insensitive: bool) -> Self {
        if case_insensitive {
            Self::TwoStep
        } else {
            Self::Direct
        }
    }
}

/// A single planned rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    /// The filename as found in the snapshot.
    pub original: String,
    /// The resolved, collision-free target filename.
    pub target: String,
}

impl RenameEntry {
    pub fn new(original: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            target: target.into(),
        }
    }

    /// True when source and target differ only in letter case.
    pub fn is_case_only(&self) -> bool {
        self.original != self.target
            && self.original.to_lowercase() == self.target.to_lowercase()
    }

    /// The line written to the console and the run log.
    pub fn log_line(&self) -> String {
        format!("{}  -->  {}", self.original, self.target)
    }
}

/// The result of one planning pass. Owned by the caller; nothing persists
/// between runs.
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    /// Renames to perform, in snapshot order.
    pub entries: Vec<RenameEntry>,
    /// Matching files that are already in canonical form.
    pub unchanged: Vec<String>,
    /// Every target name assigned during this pass.
    pub seen: HashSet<String>,
}

impl RenamePlan {
    /// Returns true if there is nothing to rename.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Log lines for every planned rename.
    pub fn log_lines(&self) -> Vec<String> {
        self.entries.iter().map(RenameEntry::log_line).collect()
    }
}

/// Errors for a single rename. Neither aborts the batch.
#[derive(Debug)]
pub enum RenameError {
    /// The source vanished between the snapshot and the rename.
    SourceMissing { name: String },
    /// The rename itself failed (permissions, I/O, ...).
    RenameFailure {
        from: String,
        to: String,
        source: io::Error,
    },
    /// The second step of a case-only rename failed and the file could not be
    /// moved back from its temporary name.
    Stranded {
        original: String,
        temp: String,
        source: io::Error,
    },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing { name } => write!(f, "File not found: {}. Skipping.", name),
            Self::RenameFailure { from, to, source } => {
                write!(f, "Error renaming {} to {}: {}", from, to, source)
            }
            Self::Stranded {
                original,
                temp,
                source,
            } => write!(
                f,
                "Error renaming {}: {}; file was left at {}",
                original, source, temp
            ),
        }
    }
}

impl std::error::Error for RenameError {}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Number of files successfully renamed.
    pub renamed_files: usize,
    /// Files skipped because the source was missing, with the reason.
    pub skipped_files: Vec<(String, String)>,
    /// Files whose rename failed, with the reason.
    pub failed_renames: Vec<(String, String)>,
}

impl ApplyReport {
    /// Records the outcome for one entry.
    pub fn record(&mut self, entry: &RenameEntry, result: &Result<(), RenameError>) {
        match result {
            Ok(()) => self.renamed_files += 1,
            Err(e @ RenameError::SourceMissing { .. }) => {
                self.skipped_files.push((entry.original.clone(), e.to_string()))
            }
            Err(e) => self
                .failed_renames
                .push((entry.original.clone(), e.to_string())),
        }
    }

    /// Returns the total number of entries processed.
    pub fn total_processed(&self) -> usize {
        self.renamed_files + self.skipped_files.len() + self.failed_renames.len()
    }

    /// Returns true if every planned rename went through.
    pub fn is_complete_success(&self) -> bool {
        self.skipped_files.is_empty() && self.failed_renames.is_empty()
    }
}

/// Plans and applies canonical renames for one directory snapshot.
pub struct RenamePlanner {
    extensions: Vec<String>,
    filters: Option<CompiledFilters>,
    normalizer: fn(&str) -> String,
}

impl RenamePlanner {
    /// Creates a planner for the given extensions (`"ogg"` or `".OGG"` both
    /// work; they are stored lowercase with a leading dot).
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        let extensions = extensions
            .iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext))
            .collect();

        Self {
            extensions,
            filters: None,
            normalizer: normalize,
        }
    }

    /// Restricts planning to files accepted by `filters`.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Replaces the filename normalizer.
    pub fn with_normalizer(mut self, normalizer: fn(&str) -> String) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Returns the recognized extension of `filename`, if any.
    pub fn matching_extension(&self, filename: &str) -> Option<&str> {
        let lower = filename.to_lowercase();
        self.extensions
            .iter()
            .find(|ext| lower.ends_with(ext.as_str()))
            .map(String::as_str)
    }

    fn is_candidate(&self, filename: &str) -> bool {
        let included = self
            .filters
            .as_ref()
            .is_none_or(|filters| filters.should_include(Path::new(filename)));
        included && self.matching_extension(filename).is_some()
    }

    /// Builds the rename plan for a directory snapshot.
    ///
    /// `snapshot` is the full listing of the directory, taken before any
    /// rename. `path_exists` answers whether a name is currently taken on
    /// disk. Targets get `_1`, `_2`, ... suffixes until they are free both in
    /// this batch and on disk. A candidate that names the source file itself
    /// (exactly, or as a case-only variant that is not a separate snapshot
    /// entry) is not a collision.
    pub fn plan<F>(&self, snapshot: &[String], path_exists: F) -> RenamePlan
    where
        F: Fn(&str) -> bool,
    {
        let listed: HashSet<&str> = snapshot.iter().map(String::as_str).collect();
        let mut plan = RenamePlan::default();

        for filename in snapshot {
            if !self.is_candidate(filename) {
                continue;
            }
            let Some(extension) = self.matching_extension(filename) else {
                continue;
            };

            let base = (self.normalizer)(filename);
            let mut target = format!("{}{}", base, extension);
            let mut counter = 1;

            while plan.seen.contains(&target)
                || (path_exists(&target) && !names_source(filename, &target, &listed))
            {
                target = format!("{}_{}{}", base, counter, extension);
                counter += 1;
            }

            plan.seen.insert(target.clone());

            if target == *filename {
                plan.unchanged.push(filename.clone());
            } else {
                plan.entries.push(RenameEntry::new(filename.as_str(), target));
            }
        }

        plan
    }

    /// Applies every entry of `plan`. Failures are recorded and the batch
    /// continues.
    pub fn apply<O: RenameOps>(
        plan: &RenamePlan,
        ops: &mut O,
        strategy: CaseRenameStrategy,
    ) -> ApplyReport {
        let mut report = ApplyReport::default();
        for entry in &plan.entries {
            let result = Self::apply_entry(entry, ops, strategy);
            report.record(entry, &result);
        }
        report
    }

    /// Performs a single planned rename.
    pub fn apply_entry<O: RenameOps>(
        entry: &RenameEntry,
        ops: &mut O,
        strategy: CaseRenameStrategy,
    ) -> Result<(), RenameError> {
        if !ops.exists(&entry.original) {
            return Err(RenameError::SourceMissing {
                name: entry.original.clone(),
            });
        }

        if entry.is_case_only() && strategy == CaseRenameStrategy::TwoStep {
            Self::rename_via_temp(entry, ops)
        } else {
            rename(ops, &entry.original, &entry.target)
        }
    }

    fn rename_via_temp<O: RenameOps>(entry: &RenameEntry, ops: &mut O) -> Result<(), RenameError> {
        let temp = ops.temp_name(&entry.original);
        rename(ops, &entry.original, &temp)?;

        if let Err(source) = ops.rename(&temp, &entry.target) {
            return match ops.rename(&temp, &entry.original) {
                Ok(()) => Err(RenameError::RenameFailure {
                    from: entry.original.clone(),
                    to: entry.target.clone(),
                    source,
                }),
                Err(_) => Err(RenameError::Stranded {
                    original: entry.original.clone(),
                    temp,
                    source,
                }),
            };
        }

        Ok(())
    }
}

/// Direct rename, with a vanished source reported as `SourceMissing`.
fn rename<O: RenameOps>(ops: &mut O, from: &str, to: &str) -> Result<(), RenameError> {
    ops.rename(from, to).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            RenameError::SourceMissing {
                name: from.to_string(),
            }
        } else {
            RenameError::RenameFailure {
                from: from.to_string(),
                to: to.to_string(),
                source,
            }
        }
    })
}

/// True if `candidate` refers to the file `filename` itself.
fn names_source(filename: &str, candidate: &str, listed: &HashSet<&str>) -> bool {
    candidate == filename
        || (candidate.to_lowercase() == filename.to_lowercase() && !listed.contains(candidate))
}
