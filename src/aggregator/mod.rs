//! Analysis views over a trace index.
//!
//! This module turns a trace index into:
//! - The "all" and "leaks" views (predicate-filtered trees)
//! - Per-scope outstanding memory statistics

pub mod leaks;
pub mod metrics;

// Re-export main types and functions
pub use leaks::{get_all, get_leaks, is_leaked, select_view, View};
pub use metrics::{render_summary, summarize_leaks, LeakSummary, ScopeLeak};
