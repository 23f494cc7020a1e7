//! Generic nested trees and their traversal.
//!
//! This module provides:
//! - A worklist iterator for breadth-first, lazily expanding walks
//! - The recursive `Tree` type shared by the trace index and its views
//! - Predicate filtering by decompose/recompose

pub mod filter;
pub mod node;
pub mod worklist;

// Re-export main types and functions
pub use filter::{
    decompose, filter_tree, match_all, predicate_error, recompose, try_decompose,
    try_filter_tree, Selected,
};
pub use node::{count_leaves, display_path, insert_path, Branch, KeyPath, Tree};
pub use worklist::Worklist;
