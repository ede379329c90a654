//! Fixed-size headers at the start of plot files.

pub mod chia;
pub mod massdb;

pub use chia::ChiaPlotHeader;
pub use massdb::MassDbHeader;
