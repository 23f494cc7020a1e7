//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a watchdog dump
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read dump: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while locating a dump file
#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Path: '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Path: '{0}' is not a file")]
    NotAFile(PathBuf),

    #[error("Path: '{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Path: '{0}' unrecognized format")]
    UnrecognizedName(PathBuf),

    #[error("No dump files found in '{0}'")]
    NoDumps(PathBuf),

    #[error("Failed to scan directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural problems in a trace index that did not come from the builder
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TraceError {
    #[error("Leaf found above address level at '{path}'")]
    LeafTooShallow { path: String },

    #[error("Branch found at address level at '{path}'")]
    BranchTooDeep { path: String },

    #[error("Empty event history at '{path}'")]
    EmptyHistory { path: String },

    #[error("Empty branch above address level at '{path}'")]
    EmptyBranch { path: String },
}

/// Errors that can occur while reading or writing trace files
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("File I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Incompatible cache version: found {found}, expected {expected}")]
    IncompatibleVersion { found: String, expected: String },

    #[error("Invalid cache contents: {0}")]
    InvalidShape(#[from] TraceError),
}

/// Errors raised while filtering a tree
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Predicate failed at '{path}': {reason}")]
    Predicate { path: String, reason: String },
}
