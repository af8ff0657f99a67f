//! tracknorm - canonical names for audio files
//!
//! This library renames audio files in a directory to a canonical
//! `"artist - title"` form. It provides the filename normalizer, the rename
//! planner with collision and case-only handling, the directory and run log
//! collaborators, and TOML configuration for extensions and file filters.

pub mod cli;
pub mod config;
pub mod directory;
pub mod normalizer;
pub mod output;
pub mod planner;
pub mod run_log;

pub use config::{CompiledFilters, Config, ConfigError};
pub use directory::{Directory, DirectoryError};
pub use normalizer::normalize;
pub use planner::{
    ApplyReport, CaseRenameStrategy, RenameEntry, RenameError, RenameOps, RenamePlan,
    RenamePlanner,
};
pub use run_log::{LogError, RunLog};

pub use cli::{RunMode, RunReport, run_cli, run_cli_with_config};
