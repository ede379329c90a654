use std::fs;
use std::path::PathBuf;

use globset::GlobSet;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::error::AppError;
use crate::extractor::{Extraction, PlotExtractor};
use crate::model::{BindingPlot, DirectorySummary, PlotEntry};
use crate::path::is_excluded;

/// Result of walking every requested directory.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(ScanResult),
    /// Interrupted before finishing; whatever was found is discarded.
    Cancelled,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    pub entries: Vec<PlotEntry>,
    pub directories: Vec<DirectorySummary>,
}

impl ScanResult {
    pub fn total_collected(&self) -> usize {
        self.entries.len()
    }

    pub fn into_plots(self) -> Vec<BindingPlot> {
        self.entries.into_iter().map(|entry| entry.plot).collect()
    }
}

/// Sequential, non-recursive walker over plot directories.
pub struct Scanner {
    exclude: Option<GlobSet>,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
}

impl Scanner {
    pub fn new(config: &Config, cancel: CancellationToken) -> Result<Self, AppError> {
        let exclude = config.compile_excludes()?;
        Ok(Self { exclude, cancel, progress: None })
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn scan(
        &self,
        extractor: &dyn PlotExtractor,
        directories: &[PathBuf],
    ) -> Result<ScanOutcome, AppError> {
        let kind = extractor.format().display_name();
        info!(
            dir_count = directories.len(),
            "searching for plot files from disk, this may take a while (enter CTRL+C to cancel running)"
        );

        let mut result = ScanResult::default();
        for dir in directories {
            if let Ok(metadata) = fs::metadata(dir)
                && !metadata.is_dir()
            {
                return Err(AppError::NotADirectory(dir.clone()));
            }

            info!(dir = %dir.display(), "searching for {kind} files");
            if let Some(progress) = &self.progress {
                progress.set_message(format!("searching {}", dir.display()));
            }

            let mut summary = DirectorySummary::new(dir.clone());
            let walker = WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name();
            for entry in walker {
                if self.cancel.is_cancelled() {
                    warn!("cancel searching plot files");
                    return Ok(ScanOutcome::Cancelled);
                }
                if let Some(progress) = &self.progress {
                    progress.tick();
                }

                let entry = entry
                    .map_err(|source| AppError::ListDirectory { path: dir.clone(), source })?;
                if entry.file_type().is_dir() || !extractor.matches(entry.file_name()) {
                    continue;
                }
                let path = entry.path();
                if is_excluded(path, self.exclude.as_ref()) {
                    debug!(path = %path.display(), "excluded by configuration");
                    continue;
                }

                summary.matched += 1;
                match extractor.extract(path)? {
                    Extraction::Collected(plot) => {
                        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or_default();
                        result.entries.push(PlotEntry { path: path.to_path_buf(), file_size, plot });
                        summary.collected += 1;
                    }
                    Extraction::Skipped(reason) => {
                        debug!(path = %path.display(), ?reason, "skipped plot file");
                        summary.skipped += 1;
                    }
                }
            }

            info!(
                dir = %dir.display(),
                db_count = summary.collected,
                skipped = summary.skipped,
                "loaded {kind} files from directory"
            );
            result.directories.push(summary);
        }

        info!(
            dir_count = directories.len(),
            total_db_count = result.total_collected(),
            "loaded {kind} files from all directories"
        );
        Ok(ScanOutcome::Completed(result))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::extractor::MassDbExtractor;
    use crate::header::MassDbHeader;
    use crate::header::massdb::PUBLIC_KEY_LEN;

    fn write_massdb(dir: &Path, ordinal: u32, plotted: bool) -> PathBuf {
        let mut public_key = [ordinal as u8; PUBLIC_KEY_LEN];
        public_key[0] = 0x02;
        let header = MassDbHeader { public_key, bit_length: 32, plotted };
        let name = format!("{ordinal}_{}_32.massdb", hex::encode(public_key));
        let path = dir.join(name);
        fs::write(&path, header.to_bytes()).unwrap();
        path
    }

    fn scanner(cancel: CancellationToken) -> Scanner {
        Scanner::new(&Config::default(), cancel).unwrap()
    }

    fn completed(outcome: ScanOutcome) -> ScanResult {
        match outcome {
            ScanOutcome::Completed(result) => result,
            ScanOutcome::Cancelled => panic!("scan was cancelled"),
        }
    }

    #[test]
    fn collects_matching_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_massdb(dir.path(), 2, true);
        write_massdb(dir.path(), 1, true);
        fs::write(dir.path().join("garbage.txt"), "hello").unwrap();

        let result = completed(
            scanner(CancellationToken::new())
                .scan(&MassDbExtractor::new(false), &[dir.path().to_path_buf()])
                .unwrap(),
        );

        assert_eq!(result.total_collected(), 2);
        assert!(result.entries[0].path.file_name().unwrap().to_string_lossy().starts_with("1_"));
        assert_eq!(result.directories[0].matched, 2);
        assert_eq!(result.directories[0].collected, 2);
    }

    #[test]
    fn corrupt_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let valid = write_massdb(dir.path(), 1, true);
        let corrupt = dir.path().join(format!("2_{}_32.massdb", "02".repeat(PUBLIC_KEY_LEN)));
        fs::write(&corrupt, b"truncated").unwrap();

        let result = completed(
            scanner(CancellationToken::new())
                .scan(&MassDbExtractor::new(false), &[dir.path().to_path_buf()])
                .unwrap(),
        );

        assert_eq!(result.total_collected(), 1);
        assert_eq!(result.entries[0].path, valid);
        assert_eq!(result.directories[0].skipped, 1);
    }

    #[test]
    fn cancelled_before_first_file_yields_no_list() {
        let dir = tempfile::tempdir().unwrap();
        for ordinal in 1..=3 {
            write_massdb(dir.path(), ordinal, true);
        }
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome =
            scanner(cancel).scan(&MassDbExtractor::new(false), &[dir.path().to_path_buf()]).unwrap();

        assert!(matches!(outcome, ScanOutcome::Cancelled));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_massdb(dir.path(), 1, true);
        let missing = dir.path().join("missing");

        let err = scanner(CancellationToken::new())
            .scan(&MassDbExtractor::new(false), &[dir.path().to_path_buf(), missing])
            .unwrap_err();

        assert!(matches!(err, AppError::ListDirectory { .. }));
    }

    #[test]
    fn file_given_as_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_massdb(dir.path(), 1, true);

        let err = scanner(CancellationToken::new())
            .scan(&MassDbExtractor::new(false), &[file])
            .unwrap_err();

        assert!(matches!(err, AppError::NotADirectory(_)));
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write_massdb(&nested, 1, true);

        let result = completed(
            scanner(CancellationToken::new())
                .scan(&MassDbExtractor::new(false), &[dir.path().to_path_buf()])
                .unwrap(),
        );

        assert_eq!(result.total_collected(), 0);
    }

    #[test]
    fn excluded_paths_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_massdb(dir.path(), 1, true);
        let config = Config {
            exclude: vec![format!("{}/*", dir.path().display())],
            ..Config::default()
        };

        let result = completed(
            Scanner::new(&config, CancellationToken::new())
                .unwrap()
                .scan(&MassDbExtractor::new(false), &[dir.path().to_path_buf()])
                .unwrap(),
        );

        assert_eq!(result.total_collected(), 0);
        assert_eq!(result.directories[0].matched, 0);
    }
}
