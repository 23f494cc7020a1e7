//! Generic nested tree used for the trace index and its filtered views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Path of keys from the root to a node
pub type KeyPath = Vec<String>;

/// One level of a tree: keys are unique and kept in sorted order
pub type Branch<L> = BTreeMap<String, Tree<L>>;

/// A node is either a leaf payload or a further mapping
///
/// Serialized untagged: branches as JSON objects, leaves as whatever
/// the payload serializes to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tree<L> {
    Branch(Branch<L>),
    Leaf(L),
}

impl<L> Tree<L> {
    pub fn is_branch(&self) -> bool {
        matches!(self, Tree::Branch(_))
    }

    pub fn as_branch(&self) -> Option<&Branch<L>> {
        match self {
            Tree::Branch(branch) => Some(branch),
            Tree::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Tree::Leaf(leaf) => Some(leaf),
            Tree::Branch(_) => None,
        }
    }

    /// Follow `path` from this node
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Tree<L>> {
        path.iter().try_fold(self, |node, key| {
            node.as_branch()?.get(key.as_ref())
        })
    }

    /// Count leaves below this node (a leaf counts itself)
    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Branch(branch) => count_leaves(branch),
        }
    }
}

impl<L> AsRef<Tree<L>> for Tree<L> {
    fn as_ref(&self) -> &Tree<L> {
        self
    }
}

/// Count leaves below a branch
pub fn count_leaves<L>(branch: &Branch<L>) -> usize {
    branch.values().map(Tree::leaf_count).sum()
}

/// Store `node` at `path` below `root`, creating intermediate branches
///
/// A leaf sitting where a branch is needed is replaced. Returns `false`
/// (and stores nothing) for an empty path.
pub fn insert_path<L>(root: &mut Branch<L>, path: &[String], node: Tree<L>) -> bool {
    let Some((last, parents)) = path.split_last() else {
        return false;
    };

    let mut base = root;
    for key in parents {
        let entry = base
            .entry(key.clone())
            .or_insert_with(|| Tree::Branch(Branch::new()));
        if !entry.is_branch() {
            *entry = Tree::Branch(Branch::new());
        }
        let Tree::Branch(children) = entry else {
            return false;
        };
        base = children;
    }

    base.insert(last.clone(), node);
    true
}

/// Render a key path for logs and error messages
pub fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|key| key.as_ref())
        .collect::<Vec<_>>()
        .join(" / ")
}
