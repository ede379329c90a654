//! File name patterns for supported plot formats.

use std::ffi::OsStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::PlotFormat;

const MASSDB_SUFFIX: &str = ".MASSDB";
const CHIA_SUFFIX: &str = ".PLOT";

// `ordinal_pubKey_bitLength.MASSDB`
static MASSDB_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+_[A-F0-9]{66}_[0-9]{2}\.MASSDB$").expect("valid pattern"));

// `plot-k32-2021-05-01-10-20-<plot id>.plot`
static CHIA_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PLOT-K[0-9]{2}-[0-9]{4}(-[0-9]{2}){4}-[A-F0-9]{64}\.PLOT$").expect("valid pattern")
});

/// Returns true when `file_name` is a syntactically valid name for `format`.
pub fn matches(format: PlotFormat, file_name: &str) -> bool {
    let upper = file_name.to_ascii_uppercase();
    let (suffix, pattern) = match format {
        PlotFormat::MassDb => (MASSDB_SUFFIX, &*MASSDB_NAME),
        PlotFormat::ChiaPlot => (CHIA_SUFFIX, &*CHIA_NAME),
    };
    upper.ends_with(suffix) && pattern.is_match(&upper)
}

/// Like [`matches`], for names straight from a directory listing.
pub fn matches_os(format: PlotFormat, file_name: &OsStr) -> bool {
    file_name.to_str().is_some_and(|name| matches(format, name))
}
