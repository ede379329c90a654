use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Application-wide error type for the massbind CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("invalid plot type '{0}', should be m1 (for native MassDB) or m2 (for Chia Plot)")]
    InvalidFormat(String),

    #[error("Cannot overwrite existing file {}, try again with --overwrite", .0.display())]
    OutputExists(PathBuf),

    #[error("Output path {} is a directory", .0.display())]
    OutputIsDirectory(PathBuf),

    #[error("Failed to list directory {}: {source}", .path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to derive binding target: {0}")]
    Derivation(String),

    #[error("Keystore error: {0}")]
    Keystore(String),

    #[error("Failed to launch editor: {0}")]
    Editor(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid exclude pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Failed to encode binding list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to save binding list: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AppError::Config(msg.into())
    }

    pub fn derivation<S: Into<String>>(msg: S) -> Self {
        AppError::Derivation(msg.into())
    }

    pub fn keystore<S: Into<String>>(msg: S) -> Self {
        AppError::Keystore(msg.into())
    }
}

/// Failure to read a plot file header. Recoverable: the file is skipped.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("header truncated")]
    Truncated,

    #[error("unrecognized magic bytes")]
    BadMagic,

    #[error("unsupported header version {0}")]
    UnsupportedVersion(u16),

    #[error("invalid plotted flag {0:#04x}")]
    InvalidFlag(u8),

    #[error("invalid public key prefix {0:#04x}")]
    InvalidPublicKey(u8),

    #[error("unexpected memo length {0}")]
    InvalidMemo(usize),
}

impl HeaderError {
    /// Maps a short read onto [`HeaderError::Truncated`].
    pub fn from_read(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof { HeaderError::Truncated } else { err.into() }
    }
}
