use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Plot file format selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlotFormat {
    /// Native MassDB files (`m1`).
    MassDb,
    /// Chia-compatible plot files (`m2`).
    ChiaPlot,
}

impl PlotFormat {
    pub fn from_name(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "m1" => Some(PlotFormat::MassDb),
            "m2" => Some(PlotFormat::ChiaPlot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlotFormat::MassDb => "m1",
            PlotFormat::ChiaPlot => "m2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlotFormat::MassDb => "native MassDB",
            PlotFormat::ChiaPlot => "Chia plot",
        }
    }

    pub fn proof_type(&self) -> ProofType {
        match self {
            PlotFormat::MassDb => ProofType::Default,
            PlotFormat::ChiaPlot => ProofType::Chia,
        }
    }
}

impl std::str::FromStr for PlotFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotFormat::from_name(s).ok_or_else(|| AppError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for PlotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Proof type tag written to the `type` field of each binding plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProofType {
    Default = 0,
    Chia = 1,
}

impl ProofType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProofType::Default),
            1 => Some(ProofType::Chia),
            _ => None,
        }
    }
}

impl Serialize for ProofType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for ProofType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        ProofType::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown proof type {value}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingPlot {
    #[serde(with = "hex::serde")]
    pub target: Vec<u8>,
    #[serde(rename = "type")]
    pub proof_type: ProofType,
    pub size: u8,
}

impl BindingPlot {
    pub fn new(target: Vec<u8>, proof_type: ProofType, size: u8) -> Self {
        BindingPlot { target, proof_type, size }
    }

    pub fn target_hex(&self) -> String {
        hex::encode(&self.target)
    }
}

/// A collected plot together with where it was found.
#[derive(Debug, Clone)]
pub struct PlotEntry {
    pub path: PathBuf,
    pub file_size: u64,
    pub plot: BindingPlot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySummary {
    pub directory: PathBuf,
    /// Entries whose file name matched the format.
    pub matched: usize,
    pub collected: usize,
    pub skipped: usize,
}

impl DirectorySummary {
    pub fn new(directory: PathBuf) -> Self {
        DirectorySummary { directory, ..Default::default() }
    }
}

/// Deduplicated binding list written to the output file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingList {
    pub plots: Vec<BindingPlot>,
    pub total_count: u64,
    pub default_count: u64,
    pub chia_count: u64,
}

impl BindingList {
    /// Merges per-format plot sequences into one list.
    ///
    /// Later plots whose target equals an earlier one are dropped, so the first
    /// occurrence wins and order is otherwise preserved. Per-format counts are
    /// tallied before the cross-format pass; `total_count` is the final length.
    pub fn aggregate<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Vec<BindingPlot>>,
    {
        let mut list = BindingList::default();
        let mut seen: HashSet<Vec<u8>> = HashSet::new();

        for group in groups {
            let mut group_seen: HashSet<Vec<u8>> = HashSet::new();
            for plot in group {
                if !group_seen.insert(plot.target.clone()) {
                    continue;
                }
                match plot.proof_type {
                    ProofType::Default => list.default_count += 1,
                    ProofType::Chia => list.chia_count += 1,
                }
                if seen.insert(plot.target.clone()) {
                    list.plots.push(plot);
                }
            }
        }

        list.total_count = list.plots.len() as u64;
        list
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot(target: &[u8], proof_type: ProofType) -> BindingPlot {
        BindingPlot::new(target.to_vec(), proof_type, 32)
    }

    #[test]
    fn parses_format_names_case_insensitively() {
        assert_eq!("m1".parse::<PlotFormat>().unwrap(), PlotFormat::MassDb);
        assert_eq!("M2".parse::<PlotFormat>().unwrap(), PlotFormat::ChiaPlot);
        assert!("".parse::<PlotFormat>().is_err());
    }

    #[test]
    fn unknown_format_reports_invalid_format() {
        let err = "m3".parse::<PlotFormat>().unwrap_err();
        assert!(matches!(&err, AppError::InvalidFormat(name) if name == "m3"));
        assert!(err.to_string().starts_with("invalid plot type 'm3'"));
    }

    #[test]
    fn aggregate_keeps_first_of_duplicate_targets() {
        let first = BindingPlot::new(vec![1, 2, 3], ProofType::Default, 32);
        let duplicate = BindingPlot::new(vec![1, 2, 3], ProofType::Default, 34);
        let other = plot(&[9], ProofType::Default);

        let list = BindingList::aggregate(vec![vec![first.clone(), other.clone(), duplicate]]);

        assert_eq!(list.plots, vec![first, other]);
        assert_eq!(list.total_count, 2);
        assert_eq!(list.default_count, 2);
        assert_eq!(list.chia_count, 0);
    }

    #[test]
    fn aggregate_counts_match_length_without_cross_format_duplicates() {
        let list = BindingList::aggregate(vec![
            vec![plot(&[1], ProofType::Default), plot(&[2], ProofType::Default)],
            vec![plot(&[3], ProofType::Chia)],
        ]);

        assert_eq!(list.total_count, list.plots.len() as u64);
        assert_eq!(list.default_count + list.chia_count, list.total_count);
        assert_eq!(list.default_count, 2);
        assert_eq!(list.chia_count, 1);
    }

    #[test]
    fn aggregate_cross_format_duplicate_keeps_per_format_tallies() {
        let list = BindingList::aggregate(vec![
            vec![plot(&[7], ProofType::Default)],
            vec![plot(&[7], ProofType::Chia)],
        ]);

        assert_eq!(list.plots.len(), 1);
        assert_eq!(list.plots[0].proof_type, ProofType::Default);
        assert_eq!(list.total_count, 1);
        assert_eq!(list.default_count, 1);
        assert_eq!(list.chia_count, 1);
    }

    #[test]
    fn binding_plot_serializes_hex_target_and_numeric_type() {
        let value = serde_json::to_value(BindingPlot::new(vec![0xab, 0x01], ProofType::Chia, 32))
            .unwrap();
        assert_eq!(value, serde_json::json!({ "target": "ab01", "type": 1, "size": 32 }));
    }
}
