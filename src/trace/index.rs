//! The trace index: `pid → file → func → address → history`.

use super::builder::build_index;
use super::history::EventHistory;
use crate::parser::read_dump_file;
use crate::tree::{decompose, display_path, try_decompose, Branch, Tree};
use crate::utils::config::TRACE_DEPTH;
use crate::utils::error::{ParseError, TraceError};
use log::info;
use serde::Serialize;
use std::path::Path;

/// Built or cache-loaded trace index
///
/// Immutable once constructed; filtering produces independent trees.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceIndex {
    root: Branch<EventHistory>,
    dirty: bool,
}

/// Counts of each level of an index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    pub processes: usize,
    pub files: usize,
    pub functions: usize,
    pub addresses: usize,
    pub events: usize,
}

impl TraceIndex {
    /// Wrap a freshly built tree; it needs saving
    pub(crate) fn fresh(root: Branch<EventHistory>) -> Self {
        Self { root, dirty: true }
    }

    /// Accept a tree loaded verbatim from the cache
    ///
    /// # Errors
    /// * `TraceError` - a leaf above address level, a branch at address
    ///   level, or an empty history
    pub fn from_loaded(root: Branch<EventHistory>) -> Result<Self, TraceError> {
        validate_shape(&root)?;
        Ok(Self { root, dirty: false })
    }

    /// Read a dump and build its index
    pub fn from_dump(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        info!("Building trace from: '{}' ...", path.display());
        let events = read_dump_file(path)?;
        Ok(build_index(events))
    }

    pub fn root(&self) -> &Branch<EventHistory> {
        &self.root
    }

    /// Whether this index was built rather than loaded, i.e. worth saving
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the index as persisted
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// History filed at one address, if any
    pub fn history(
        &self,
        pid: &str,
        file: &str,
        func: &str,
        address: &str,
    ) -> Option<&EventHistory> {
        self.lookup(&[pid, file, func, address])
    }

    fn lookup(&self, path: &[&str]) -> Option<&EventHistory> {
        let (last, parents) = path.split_last()?;
        let mut branch = &self.root;
        for key in parents {
            branch = branch.get(*key)?.as_branch()?;
        }
        branch.get(*last)?.as_leaf()
    }

    pub fn stats(&self) -> TraceStats {
        let mut stats = TraceStats::default();
        decompose(&self.root, |path, _, node| {
            match (path.len(), node) {
                (1, _) => stats.processes += 1,
                (2, _) => stats.files += 1,
                (3, _) => stats.functions += 1,
                (_, Tree::Leaf(history)) => {
                    stats.addresses += 1;
                    stats.events += history.len();
                }
                _ => {}
            }
            false
        });
        stats
    }
}

/// Check that every leaf sits at address level and nothing is empty
fn validate_shape(root: &Branch<EventHistory>) -> Result<(), TraceError> {
    try_decompose(root, |path, _, node| {
        let depth = path.len();
        match node {
            Tree::Leaf(_) if depth < TRACE_DEPTH => Err(TraceError::LeafTooShallow {
                path: display_path(path),
            }),
            Tree::Leaf(history) if history.is_empty() => Err(TraceError::EmptyHistory {
                path: display_path(path),
            }),
            Tree::Branch(_) if depth >= TRACE_DEPTH => Err(TraceError::BranchTooDeep {
                path: display_path(path),
            }),
            Tree::Branch(children) if children.is_empty() => Err(TraceError::EmptyBranch {
                path: display_path(path),
            }),
            _ => Ok(false),
        }
    })?;
    Ok(())
}
