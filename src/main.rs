use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracknorm::cli::{RunMode, run_cli_with_config};

/// Rename audio files to a canonical "artist - title" form.
///
/// Without --apply only a preview is shown and nothing is renamed.
#[derive(Parser, Debug)]
#[command(name = "tracknorm", version, about)]
struct Args {
    /// Directory containing the audio files (a leading ~ is expanded)
    path: String,

    /// Rename the files instead of previewing the changes
    #[arg(long)]
    apply: bool,

    /// Configuration file to use instead of the discovered one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Name of the log file written into the directory
    #[arg(long, value_name = "NAME")]
    log_file: Option<String>,
}

/// Maps parsed arguments to the directory to process and the run mode.
fn resolve(args: &Args) -> (PathBuf, RunMode) {
    let dir_path = PathBuf::from(shellexpand::tilde(&args.path).into_owned());
    let mode = if args.apply {
        RunMode::Apply
    } else {
        RunMode::DryRun
    };
    (dir_path, mode)
}

fn main() {
    let args = Args::parse();
    let (dir_path, mode) = resolve(&args);

    if let Err(e) = run_cli_with_config(
        mode,
        &dir_path,
        args.config.as_deref(),
        args.log_file.as_deref(),
    ) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
