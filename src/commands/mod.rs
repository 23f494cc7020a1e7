//! CLI command implementations.
//!
//! Commands orchestrate the library components; errors are reported with
//! `anyhow` context.

pub mod analyze;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, load_or_build, validate_args};
pub use models::AnalyzeArgs;
pub use utils::{display_version, validate_dump_file};
