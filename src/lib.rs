//! Library entry point for the massbind CLI.

pub mod cancel;
pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod extractor;
pub mod header;
pub mod keystore;
pub mod logging;
pub mod model;
pub mod path;
pub mod report;
pub mod scanner;
pub mod target;
pub mod utils;
