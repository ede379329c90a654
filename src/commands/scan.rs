use std::path::PathBuf;

use super::prepare_extractor;
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{BindingList, PlotFormat};
use crate::path::resolve_directories;
use crate::scanner::{ScanOutcome, ScanResult, Scanner};
use crate::utils::{display_path, format_bytes};

pub struct ScanOptions {
    pub format: PlotFormat,
    pub directories: Vec<PathBuf>,
    pub list_all: bool,
    pub keystore: Option<PathBuf>,
    pub verbose: bool,
    pub cancel: CancellationToken,
}

/// Dry run of `collect`: discovers plots and prints what would be saved.
pub fn execute_scan(options: ScanOptions) -> Result<ScanOutcome, AppError> {
    let config = Config::load()?;
    let directories = resolve_directories(&options.directories, &config.directory_paths()?)?;
    let extractor = prepare_extractor(options.format, options.list_all, options.keystore, &config)?;
    let scanner = Scanner::new(&config, options.cancel)?;

    let outcome = scanner.scan(extractor.as_ref(), &directories)?;
    match &outcome {
        ScanOutcome::Completed(result) => print_report(result, options.format, options.verbose),
        ScanOutcome::Cancelled => println!("Scan cancelled."),
    }
    Ok(outcome)
}

fn print_report(result: &ScanResult, format: PlotFormat, verbose: bool) {
    println!("Scan results ({}, {}):", format, format.display_name());
    for summary in &result.directories {
        println!(
            "- {:<50} {:>4} plot(s), {} skipped",
            display_path(&summary.directory),
            summary.collected,
            summary.skipped
        );
        if verbose {
            for entry in &result.entries {
                if entry.path.parent() != Some(summary.directory.as_path()) {
                    continue;
                }
                println!(
                    "    • {:<60} size={:<3} {:>10}  {}",
                    display_path(&entry.path),
                    entry.plot.size,
                    format_bytes(entry.file_size),
                    entry.plot.target_hex()
                );
            }
        }
    }

    let total_size: u64 = result.entries.iter().map(|entry| entry.file_size).sum();
    let plots = result.entries.iter().map(|entry| entry.plot.clone()).collect::<Vec<_>>();
    let list = BindingList::aggregate([plots]);
    let duplicates = result.total_collected() as u64 - list.total_count;
    println!("Total plots: {} ({})", list.total_count, format_bytes(total_size));
    if duplicates > 0 {
        println!("Duplicate targets ignored: {duplicates}");
    }
}
