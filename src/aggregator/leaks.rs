//! Views over a trace index: everything, or only leaked addresses.

use crate::trace::{EventHistory, TraceIndex};
use crate::tree::{count_leaves, filter_tree, Branch, Tree};
use log::debug;

/// Which part of the index to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum View {
    /// Every address with its full history
    #[default]
    All,
    /// Only addresses whose most recent event is still live
    Leaks,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::All => "Memory Usage",
            View::Leaks => "Memory Leaks",
        }
    }
}

/// Matches address histories whose most recent event leaves memory live
pub fn is_leaked(_path: &[String], _key: &str, node: &Tree<EventHistory>) -> bool {
    matches!(node, Tree::Leaf(history) if history.is_outstanding())
}

/// The whole index as an independent tree
pub fn get_all(index: &TraceIndex) -> Branch<EventHistory> {
    index.root().clone()
}

/// Only the `(pid, file, func, address)` paths still holding memory
pub fn get_leaks(index: &TraceIndex) -> Branch<EventHistory> {
    let leaks = filter_tree(index.root(), is_leaked);
    debug!("Leak filter kept {} addresses", count_leaves(&leaks));
    leaks
}

/// Tree for the requested view
pub fn select_view(index: &TraceIndex, view: View) -> Branch<EventHistory> {
    match view {
        View::All => get_all(index),
        View::Leaks => get_leaks(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Address, Event, Key, Relocation};
    use crate::trace::build_index;
    use crate::tree::decompose;

    fn event(address: Address, line: i64, size: i128) -> Event {
        Event {
            pid: Key::new("1"),
            file: Key::new("a.c"),
            func: Key::new("f"),
            line,
            address,
            size,
        }
    }

    fn scalar(address: &str) -> Address {
        Address::Scalar(Key::new(address))
    }

    fn relocation(from: &str, to: &str) -> Address {
        Address::Relocation(Relocation {
            from: Key::new(from),
            to: Key::new(to),
        })
    }

    #[test]
    fn test_freed_allocation_is_not_leaked() {
        let index = build_index(vec![
            event(scalar("0x1"), 10, 8),
            event(scalar("0x1"), 20, 0),
        ]);

        assert_eq!(index.history("1", "a.c", "f", "0x1").map(|h| h.len()), Some(2));
        assert!(get_leaks(&index).is_empty());
    }

    #[test]
    fn test_relocated_allocation_is_leaked() {
        let index = build_index(vec![
            event(scalar("0x1"), 10, 8),
            event(relocation("0x1", "0x2"), 20, 8),
        ]);

        let func = index.root()["1"].get_path(&["a.c", "f"]).unwrap();
        let addresses: Vec<&String> = func.as_branch().unwrap().keys().collect();
        assert_eq!(addresses, vec!["0x2"]);

        let leaks = get_leaks(&index);
        let leaked = Tree::Branch(leaks)
            .get_path(&["1", "a.c", "f", "0x2"])
            .and_then(|node| node.as_leaf().map(EventHistory::len));
        assert_eq!(leaked, Some(2));
    }

    #[test]
    fn test_leaks_are_a_subset_of_the_index() {
        let index = build_index(vec![
            event(scalar("0x1"), 1, 8),
            event(scalar("0x2"), 2, 16),
            event(scalar("0x2"), 3, 0),
            event(relocation("0x3", "0x4"), 4, 32),
            event(scalar("0x5"), 5, 0),
        ]);
        let source = Tree::Branch(index.root().clone());
        let leaks = get_leaks(&index);

        for (path, node) in decompose(&leaks, |_, _, _| true) {
            let original = source.get_path(&path).expect("path exists in source");
            if let Tree::Leaf(history) = node {
                assert_eq!(original.as_leaf(), Some(history));
            }
        }
        assert_eq!(count_leaves(&leaks), 2);
    }

    #[test]
    fn test_only_most_recent_event_decides() {
        // Freed, then allocated again at the same address
        let index = build_index(vec![
            event(scalar("0x1"), 1, 8),
            event(scalar("0x1"), 2, 0),
            event(scalar("0x1"), 3, 24),
        ]);

        assert_eq!(count_leaves(&get_leaks(&index)), 1);
    }

    #[test]
    fn test_select_view() {
        let index = build_index(vec![
            event(scalar("0x1"), 1, 8),
            event(scalar("0x2"), 2, 0),
        ]);

        assert_eq!(select_view(&index, View::All), *index.root());
        assert_eq!(count_leaves(&select_view(&index, View::Leaks)), 1);
        assert_eq!(View::Leaks.title(), "Memory Leaks");
    }
}
