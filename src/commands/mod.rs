use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::extractor::{self, ExtractOptions, PlotExtractor};
use crate::keystore::{KeyOwnership, Keystore};
use crate::model::PlotFormat;
use crate::path::absolute;

pub mod collect;
pub mod config_cmd;
pub mod scan;

pub use collect::execute_collect;
pub use config_cmd::execute_config;
pub use scan::execute_scan;

/// Builds the extractor for `format`, loading the keystore up front so a bad
/// keystore fails the run before any directory is read.
fn prepare_extractor(
    format: PlotFormat,
    list_all: bool,
    keystore: Option<PathBuf>,
    config: &Config,
) -> Result<Box<dyn PlotExtractor>, AppError> {
    let keystore_path = match keystore {
        Some(path) => Some(absolute(&path)?),
        None => config.keystore_path()?,
    };

    let keystore: Option<Arc<dyn KeyOwnership>> = match (format, keystore_path) {
        (PlotFormat::ChiaPlot, Some(path)) => {
            let keystore = Keystore::load(&path)?;
            info!(
                path = %path.display(),
                pool_keys = keystore.pool_key_count(),
                farmer_keys = keystore.farmer_key_count(),
                "loaded keystore"
            );
            Some(Arc::new(keystore))
        }
        (PlotFormat::MassDb, Some(path)) => {
            warn!(path = %path.display(), "keystore is only used for m2 plots, ignoring");
            None
        }
        (_, None) => None,
    };

    Ok(extractor::for_format(format, ExtractOptions { list_all, keystore }))
}
