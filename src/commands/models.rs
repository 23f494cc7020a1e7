use crate::aggregator::View;
use crate::utils::config::{DEFAULT_SUMMARY_ROWS, DEFAULT_VIEW_DEPTH};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Dump file to analyze
    pub path: Option<PathBuf>,

    /// Directory to search for the newest dump
    pub scan: Option<PathBuf>,

    /// Ignore an existing `.trace` cache
    pub no_cache: bool,

    /// Do not write the `.trace` cache
    pub no_save: bool,

    /// Which part of the trace to show
    pub view: View,

    /// Levels expanded in the tree view
    pub depth: usize,

    /// Print the outstanding allocation table
    pub summary: bool,

    /// Rows in the outstanding allocation table
    pub top: usize,

    /// Write the selected view as JSON
    pub export: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            path: None,
            scan: None,
            no_cache: false,
            no_save: false,
            view: View::All,
            depth: DEFAULT_VIEW_DEPTH,
            summary: false,
            top: DEFAULT_SUMMARY_ROWS,
            export: None,
        }
    }
}
