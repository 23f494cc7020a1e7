//! Output writers for trace data.
//!
//! This module handles:
//! - The JSON trace cache (save/load)
//! - JSON export of filtered views
//! - Expandable text rendering of trees

pub mod json;
pub mod tree_view;

// Re-export main functions
pub use json::{cache_path_for, load_trace, save_trace, write_tree};
pub use tree_view::{build_display_tree, DisplayNode, DisplayTree};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
