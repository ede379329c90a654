//! Per-format extraction of binding plots from matched files.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::classify;
use crate::error::AppError;
use crate::header::{chia, massdb};
use crate::keystore::KeyOwnership;
use crate::model::{BindingPlot, PlotFormat};
use crate::target;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Collected(BindingPlot),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Header could not be read or parsed.
    Unreadable,
    /// MassDB file still being plotted.
    NotPlotted,
    /// Keystore lacks the pool or farmer private key.
    NotOwned,
}

/// Strategy for one plot format.
///
/// Header read failures are reported as [`Extraction::Skipped`]; an `Err`
/// means the whole run must stop.
pub trait PlotExtractor {
    fn format(&self) -> PlotFormat;

    fn matches(&self, file_name: &OsStr) -> bool {
        classify::matches_os(self.format(), file_name)
    }

    fn extract(&self, path: &Path) -> Result<Extraction, AppError>;
}

#[derive(Clone, Default)]
pub struct ExtractOptions {
    /// Include MassDB files that are not fully plotted.
    pub list_all: bool,
    /// Restrict Chia plots to those whose keys are held here.
    pub keystore: Option<Arc<dyn KeyOwnership>>,
}

pub fn for_format(format: PlotFormat, options: ExtractOptions) -> Box<dyn PlotExtractor> {
    match format {
        PlotFormat::MassDb => Box::new(MassDbExtractor::new(options.list_all)),
        PlotFormat::ChiaPlot => Box::new(ChiaPlotExtractor::new(options.keystore)),
    }
}

pub struct MassDbExtractor {
    list_all: bool,
}

impl MassDbExtractor {
    pub fn new(list_all: bool) -> Self {
        Self { list_all }
    }
}

impl PlotExtractor for MassDbExtractor {
    fn format(&self) -> PlotFormat {
        PlotFormat::MassDb
    }

    fn extract(&self, path: &Path) -> Result<Extraction, AppError> {
        let header = match massdb::read_header(path) {
            Ok(header) => header,
            Err(err) => {
                warn!(path = %path.display(), %err, "fail to read native massdb info");
                return Ok(Extraction::Skipped(SkipReason::Unreadable));
            }
        };

        if !header.plotted && !self.list_all {
            debug!(path = %path.display(), "skipping massdb that is not fully plotted");
            return Ok(Extraction::Skipped(SkipReason::NotPlotted));
        }

        let target = target::massdb_target(&header.public_key, header.bit_length)?;
        Ok(Extraction::Collected(BindingPlot::new(
            target,
            self.format().proof_type(),
            header.bit_length,
        )))
    }
}

pub struct ChiaPlotExtractor {
    keystore: Option<Arc<dyn KeyOwnership>>,
}

impl ChiaPlotExtractor {
    pub fn new(keystore: Option<Arc<dyn KeyOwnership>>) -> Self {
        Self { keystore }
    }

    fn is_owned(&self, header: &chia::ChiaPlotHeader) -> bool {
        let Some(keystore) = &self.keystore else {
            return true;
        };
        let has_pool =
            header.pool_public_key.as_ref().is_some_and(|key| keystore.has_pool_key(key));
        has_pool && keystore.has_farmer_key(&header.farmer_public_key)
    }
}

impl PlotExtractor for ChiaPlotExtractor {
    fn format(&self) -> PlotFormat {
        PlotFormat::ChiaPlot
    }

    fn extract(&self, path: &Path) -> Result<Extraction, AppError> {
        let header = match chia::read_header(path) {
            Ok(header) => header,
            Err(err) => {
                warn!(path = %path.display(), %err, "fail to read chia plot info");
                return Ok(Extraction::Skipped(SkipReason::Unreadable));
            }
        };

        if !self.is_owned(&header) {
            debug!(path = %path.display(), "skipping chia plot without local private keys");
            return Ok(Extraction::Skipped(SkipReason::NotOwned));
        }

        let target = target::chia_target(&header.plot_id, header.k)?;
        Ok(Extraction::Collected(BindingPlot::new(target, self.format().proof_type(), header.k)))
    }
}
