//! Input selection: which watchdog dump to analyze.

pub mod dump;

// Re-export main types
pub use dump::{parse_dump_name, Dump};
