//! Trace index construction.
//!
//! This module turns an ordered stream of watchdog events into a nested
//! `pid → file → func → address → history` index:
//! - Per-address histories, newest event first
//! - Relocation-aware merging of histories
//! - Shape validation for indexes loaded from the cache

pub mod builder;
pub mod history;
pub mod index;

// Re-export main types and functions
pub use builder::{build_index, Scope, TraceBuilder};
pub use history::EventHistory;
pub use index::{TraceIndex, TraceStats};
