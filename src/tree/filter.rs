//! Predicate filtering of nested trees.
//!
//! Filtering is a decompose/recompose transform:
//! 1. Decompose walks the tree breadth-first with a [`Worklist`], handing
//!    every `(path, key, node)` triple to the predicate. Branch nodes are
//!    offered too, so a predicate can keep a whole subtree.
//! 2. Recompose rebuilds a fresh tree from the surviving `(path, node)`
//!    pairs, creating intermediate branches on demand.
//!
//! The source tree is never mutated; surviving nodes are cloned.

use super::node::{display_path, insert_path, Branch, KeyPath, Tree};
use super::worklist::Worklist;
use crate::utils::error::FilterError;
use log::debug;
use std::convert::Infallible;

/// A node that passed the predicate, with its full path
pub type Selected<'a, L> = (KeyPath, &'a Tree<L>);

/// Predicate that keeps everything
pub fn match_all<L>(_path: &[String], _key: &str, _node: &Tree<L>) -> bool {
    true
}

/// Walk `root` and collect every node accepted by `predicate`
///
/// Nodes are emitted in discovery order: all children of a branch before
/// any grandchildren, so a shallow match always precedes deeper ones on
/// the same path. The first predicate error aborts the walk.
pub fn try_decompose<'a, L, E, P>(
    root: &'a Branch<L>,
    mut predicate: P,
) -> Result<Vec<Selected<'a, L>>, E>
where
    P: FnMut(&[String], &str, &Tree<L>) -> Result<bool, E>,
{
    let mut selected = Vec::new();
    let mut worklist: Worklist<'a, (KeyPath, &'a Branch<L>)> = Worklist::new();
    worklist.push((Vec::new(), root));

    while let Some((prefix, branch)) = worklist.next() {
        for (key, node) in branch {
            let mut path = prefix.clone();
            path.push(key.clone());

            if let Tree::Branch(children) = node {
                worklist.push((path.clone(), children));
            }

            if predicate(&path, key, node)? {
                selected.push((path, node));
            }
        }
    }

    Ok(selected)
}

/// Infallible form of [`try_decompose`]
pub fn decompose<'a, L, P>(root: &'a Branch<L>, mut predicate: P) -> Vec<Selected<'a, L>>
where
    P: FnMut(&[String], &str, &Tree<L>) -> bool,
{
    let result: Result<_, Infallible> =
        try_decompose(root, |path, key, node| Ok(predicate(path, key, node)));
    match result {
        Ok(selected) => selected,
        Err(never) => match never {},
    }
}

/// Rebuild a tree from selected `(path, node)` pairs
///
/// Intermediate levels are created as needed; when two pairs target the
/// same path, the later one wins.
pub fn recompose<L, I, N>(items: I) -> Branch<L>
where
    L: Clone,
    I: IntoIterator<Item = (KeyPath, N)>,
    N: AsRef<Tree<L>>,
{
    let mut root = Branch::new();
    for (path, node) in items {
        insert_path(&mut root, &path, node.as_ref().clone());
    }
    root
}

/// Filter `root`, propagating the first predicate error
pub fn try_filter_tree<L, P>(root: &Branch<L>, predicate: P) -> Result<Branch<L>, FilterError>
where
    L: Clone,
    P: FnMut(&[String], &str, &Tree<L>) -> Result<bool, FilterError>,
{
    let selected = try_decompose(root, predicate)?;
    debug!("Filter selected {} nodes", selected.len());
    Ok(recompose(selected))
}

/// Filter `root` with an infallible predicate
pub fn filter_tree<L, P>(root: &Branch<L>, predicate: P) -> Branch<L>
where
    L: Clone,
    P: FnMut(&[String], &str, &Tree<L>) -> bool,
{
    let selected = decompose(root, predicate);
    debug!("Filter selected {} nodes", selected.len());
    recompose(selected)
}

/// Wrap an error message from a predicate with the path it failed on
pub fn predicate_error(path: &[String], reason: impl Into<String>) -> FilterError {
    FilterError::Predicate {
        path: display_path(path),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> Branch<i64> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_match_all_is_identity() {
        let source = tree(json!({
            "a": {"x": 1, "y": {"deep": 2}},
            "b": 3,
            "c": {}
        }));

        assert_eq!(filter_tree(&source, match_all), source);
    }

    #[test]
    fn test_decompose_is_breadth_first() {
        let source = tree(json!({"a": {"b": {"c": 1}}, "z": 2}));
        let paths: Vec<KeyPath> = decompose(&source, match_all)
            .into_iter()
            .map(|(path, _)| path)
            .collect();

        assert_eq!(
            paths,
            vec![
                vec!["a".to_string()],
                vec!["z".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ]
        );
    }

    #[test]
    fn test_leaf_predicate_prunes_empty_branches() {
        let source = tree(json!({
            "keep": {"x": 5, "y": 0},
            "drop": {"z": 0}
        }));

        let filtered = filter_tree(&source, |_, _, node| {
            matches!(node, Tree::Leaf(value) if *value != 0)
        });

        assert_eq!(filtered, tree(json!({"keep": {"x": 5}})));
    }

    #[test]
    fn test_branch_match_keeps_whole_subtree() {
        let source = tree(json!({
            "a": {"x": 1, "y": 2},
            "b": {"x": 3}
        }));

        let filtered = filter_tree(&source, |path, _, _| path.len() == 1 && path[0] == "a");
        assert_eq!(filtered, tree(json!({"a": {"x": 1, "y": 2}})));
    }

    #[test]
    fn test_shallow_and_deep_matches_both_apply() {
        let source = tree(json!({"a": {"x": 1, "y": 2}}));

        // Whole "a" plus its "x" leaf: deeper write lands inside the subtree
        let filtered = filter_tree(&source, |_, key, _| key == "a" || key == "x");
        assert_eq!(filtered, source);
    }

    #[test]
    fn test_filter_does_not_touch_source() {
        let source = tree(json!({"a": {"x": 1}}));
        let before = source.clone();

        let mut filtered = filter_tree(&source, match_all);
        filtered.clear();

        assert_eq!(source, before);
    }

    #[test]
    fn test_predicate_error_aborts() {
        let source = tree(json!({"a": {"x": 1}, "b": 2}));
        let mut calls = 0;

        let result = try_filter_tree(&source, |path, key, _| {
            calls += 1;
            if key == "b" {
                Err(predicate_error(path, "boom"))
            } else {
                Ok(true)
            }
        });

        assert_eq!(
            result,
            Err(FilterError::Predicate {
                path: "b".to_string(),
                reason: "boom".to_string(),
            })
        );
        // "a" and "b" seen, "x" never reached
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_recompose_last_write_wins() {
        let one = Tree::Leaf(1);
        let two = Tree::Leaf(2);
        let rebuilt: Branch<i64> = recompose(vec![
            (vec!["k".to_string()], &one),
            (vec!["k".to_string()], &two),
        ]);

        assert_eq!(rebuilt, tree(json!({"k": 2})));
    }

    #[test]
    fn test_recompose_skips_empty_paths() {
        let leaf = Tree::Leaf(1);
        let rebuilt: Branch<i64> = recompose(vec![(Vec::new(), &leaf)]);
        assert!(rebuilt.is_empty());
    }
}
