//! Command-line orchestration for tracknorm.
//!
//! This module wires one run together:
//! - Configuration loading and filter compilation
//! - Directory snapshot
//! - Rename planning
//! - Applying the plan (unless it is a dry run)
//! - Appending the run log

use crate::config::Config;
use crate::directory::Directory;
use crate::output::OutputFormatter;
use crate::planner::{ApplyReport, CaseRenameStrategy, RenameOps, RenamePlan, RenamePlanner};
use crate::run_log::RunLog;
use std::path::Path;

/// Whether a run touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compute, print and log the plan without renaming anything.
    DryRun,
    /// Compute the plan and perform the renames.
    Apply,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub mode: RunMode,
    pub plan: RenamePlan,
    /// Present only when the plan was applied.
    pub apply: Option<ApplyReport>,
    /// Whether a record was appended to the log file.
    pub log_written: bool,
}

/// Runs tracknorm on `dir_path` with configuration discovered the usual way.
///
/// # Examples
///
/// ```no_run
/// use tracknorm::cli::{run_cli, RunMode};
/// use std::path::Path;
///
/// match run_cli(RunMode::DryRun, Path::new("/path/to/music")) {
///     Ok(report) => println!("{} renames planned", report.plan.entries.len()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(mode: RunMode, dir_path: &Path) -> Result<RunReport, String> {
    run_cli_with_config(mode, dir_path, None, None)
}

/// Runs tracknorm with an optional configuration file and log filename
/// override.
///
/// Errors are returned only for problems that prevent the run from starting
/// (bad configuration, unreadable directory). Per-file rename failures and
/// log write failures are reported and the run still succeeds.
pub fn run_cli_with_config(
    mode: RunMode,
    dir_path: &Path,
    config_path: Option<&Path>,
    log_file: Option<&str>,
) -> Result<RunReport, String> {
    let mut config =
        Config::load(config_path).map_err(|e| format!("Error loading configuration: {}", e))?;
    if let Some(log_file) = log_file {
        config.normalize.log_file = log_file.to_string();
        config
            .validate()
            .map_err(|e| format!("Error loading configuration: {}", e))?;
    }
    let filters = config
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let mut directory = Directory::open(dir_path).map_err(|e| e.to_string())?;
    let snapshot = directory.snapshot().map_err(|e| e.to_string())?;

    match mode {
        RunMode::DryRun => OutputFormatter::dry_run_notice(&format!(
            "Analyzing contents of: {}",
            directory.path().display()
        )),
        RunMode::Apply => OutputFormatter::info(&format!(
            "Normalizing contents of: {}",
            directory.path().display()
        )),
    }

    let planner = RenamePlanner::new(&config.normalize.extensions).with_filters(filters);
    let plan = planner.plan(&snapshot, |name| directory.exists(name));

    if plan.is_empty() {
        OutputFormatter::plain("All files already have canonical names.");
    }
    for line in plan.log_lines() {
        OutputFormatter::plain(&line);
    }

    let apply = match mode {
        RunMode::DryRun => None,
        RunMode::Apply => {
            let strategy = CaseRenameStrategy::for_filesystem(config.normalize.case_insensitive_fs);
            Some(apply_with_progress(&plan, &mut directory, strategy))
        }
    };

    let log = RunLog::new(plan.log_lines());
    let log_written = match log.append(directory.path(), &config.normalize.log_file) {
        Ok(written) => written,
        Err(e) => {
            OutputFormatter::warning(&format!("Could not write log: {}", e));
            false
        }
    };

    OutputFormatter::summary(&plan, apply.as_ref());
    match &apply {
        None => {
            OutputFormatter::dry_run_notice("No files were renamed.");
            if !plan.is_empty() {
                OutputFormatter::plain(&format!(
                    "Run 'tracknorm {} --apply' to rename.",
                    directory.path().display()
                ));
            }
        }
        Some(report) if report.is_complete_success() => {
            OutputFormatter::success("Normalization complete!");
        }
        Some(_) => {
            OutputFormatter::warning("Some files could not be renamed. Please review errors above.");
        }
    }

    Ok(RunReport {
        mode,
        plan,
        apply,
        log_written,
    })
}

/// Applies `plan` entry by entry while driving a progress bar.
fn apply_with_progress(
    plan: &RenamePlan,
    directory: &mut Directory,
    strategy: CaseRenameStrategy,
) -> ApplyReport {
    let pb = OutputFormatter::create_progress_bar(plan.entries.len() as u64);
    let mut report = ApplyReport::default();

    for entry in &plan.entries {
        pb.set_message(entry.target.clone());
        let result = RenamePlanner::apply_entry(entry, directory, strategy);
        if let Err(e) = &result {
            pb.suspend(|| OutputFormatter::error(&e.to_string()));
        }
        report.record(entry, &result);
        pb.inc(1);
    }

    pb.finish_and_clear();
    report
}
