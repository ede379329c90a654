use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use super::prepare_extractor;
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{BindingList, PlotFormat};
use crate::path::{absolute, resolve_directories};
use crate::report::write_binding_list;
use crate::scanner::{ScanOutcome, Scanner};
use crate::utils::display_path;

pub struct CollectOptions {
    pub output: PathBuf,
    pub format: PlotFormat,
    pub directories: Vec<PathBuf>,
    pub list_all: bool,
    pub overwrite: bool,
    pub keystore: Option<PathBuf>,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectOutcome {
    Saved { path: PathBuf, total_count: u64 },
    /// No plots were found; nothing was written.
    Empty,
    /// Interrupted; nothing was written.
    Cancelled,
}

pub fn execute_collect(options: CollectOptions) -> Result<CollectOutcome, AppError> {
    let output = check_output_path(&options.output, options.overwrite)?;

    let config = Config::load()?;
    let directories = resolve_directories(&options.directories, &config.directory_paths()?)?;
    let extractor = prepare_extractor(options.format, options.list_all, options.keystore, &config)?;

    let progress = spinner();
    let scanner = Scanner::new(&config, options.cancel)?.with_progress(progress.clone());
    let outcome = scanner.scan(extractor.as_ref(), &directories);
    progress.finish_and_clear();

    let result = match outcome {
        Ok(ScanOutcome::Completed(result)) => result,
        Ok(ScanOutcome::Cancelled) => {
            println!("cancelled searching plot files, nothing was saved");
            return Ok(CollectOutcome::Cancelled);
        }
        Err(err) => {
            error!(%err, "fail to get binding list");
            return Err(err);
        }
    };

    let list = BindingList::aggregate([result.into_plots()]);
    if list.is_empty() {
        println!("saved nothing in the binding list");
        return Ok(CollectOutcome::Empty);
    }

    let byte_size = write_binding_list(&output, &list).inspect_err(|err| {
        error!(%err, total_count = list.total_count, "fail to write into binding list file");
    })?;
    info!(
        path = %output.display(),
        total_count = list.total_count,
        default_count = list.default_count,
        chia_count = list.chia_count,
        byte_size,
        "saved binding list"
    );

    println!("collected {} plot files.", list.total_count);
    println!("Binding list: {}", display_path(&output));
    Ok(CollectOutcome::Saved { path: output, total_count: list.total_count })
}

/// Rejects directories and, unless overwriting, existing files.
pub fn check_output_path(path: &Path, overwrite: bool) -> Result<PathBuf, AppError> {
    let output = absolute(path)?;
    if output.is_dir() {
        return Err(AppError::OutputIsDirectory(output));
    }
    if output.exists() && !overwrite {
        return Err(AppError::OutputExists(output));
    }
    Ok(output)
}

fn spinner() -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(120));
    progress
}
