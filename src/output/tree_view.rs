//! Expandable text rendering of trace trees.
//!
//! The display tree is built breadth-first with a [`Worklist`]: every
//! branch, history and event discovered while labelling one level is
//! queued for expansion after the current level. Nodes live in an arena
//! and refer to their children by index.

use crate::parser::Event;
use crate::trace::EventHistory;
use crate::tree::{Branch, Tree, Worklist};
use crate::utils::config::LEVEL_LABELS;
use colored::*;

/// One line of the display tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    pub content: String,
    pub depth: usize,
    pub children: Vec<usize>,
}

/// Arena of display nodes; index 0 is the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTree {
    nodes: Vec<DisplayNode>,
}

/// Work still to be expanded under an existing display node
enum Pending<'a> {
    Branch(usize, &'a Branch<EventHistory>),
    History(usize, &'a EventHistory),
    Event(usize, &'a Event),
}

impl DisplayTree {
    fn with_root(title: &str) -> Self {
        Self {
            nodes: vec![DisplayNode {
                content: title.to_string(),
                depth: 0,
                children: Vec::new(),
            }],
        }
    }

    fn add_child(&mut self, parent: usize, content: String) -> usize {
        let index = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(DisplayNode {
            content,
            depth,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        index
    }

    pub fn root(&self) -> &DisplayNode {
        &self.nodes[0]
    }

    pub fn node(&self, index: usize) -> Option<&DisplayNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Render the tree, collapsing everything deeper than `max_depth`
    ///
    /// Collapsed nodes show how many children they hide.
    pub fn render(&self, max_depth: usize) -> String {
        let mut lines = Vec::new();
        self.render_node(0, max_depth, &mut lines);
        lines.join("\n")
    }

    fn render_node(&self, index: usize, max_depth: usize, lines: &mut Vec<String>) {
        let node = &self.nodes[index];
        let indent = "  ".repeat(node.depth);

        if node.children.is_empty() {
            lines.push(format!("{}  {}", indent, node.content.dimmed()));
            return;
        }

        if node.depth >= max_depth {
            lines.push(format!(
                "{}▸ {} {}",
                indent,
                node.content.bold(),
                format!("[+{}]", node.children.len()).cyan()
            ));
            return;
        }

        lines.push(format!("{}▾ {}", indent, node.content.bold()));
        for &child in &node.children {
            self.render_node(child, max_depth, lines);
        }
    }
}

/// Label a key by the index level it sits at
fn label(depth: usize, key: &str) -> String {
    match LEVEL_LABELS.get(depth) {
        Some(name) => format!("{}: {}", name, key),
        None => key.to_string(),
    }
}

/// Build the display tree for a trace tree
///
/// **Public** - main entry point for the tree view
pub fn build_display_tree(title: &str, tree: &Branch<EventHistory>) -> DisplayTree {
    let mut display = DisplayTree::with_root(title);
    let mut worklist = Worklist::new();
    worklist.push(Pending::Branch(0, tree));

    while let Some(pending) = worklist.next() {
        match pending {
            Pending::Branch(parent, branch) => {
                let level = display.nodes[parent].depth;
                for (key, node) in branch {
                    let child = display.add_child(parent, label(level, key));
                    match node {
                        Tree::Branch(children) => worklist.push(Pending::Branch(child, children)),
                        Tree::Leaf(history) => worklist.push(Pending::History(child, history)),
                    };
                }
            }
            Pending::History(parent, history) => {
                for (position, event) in history.iter().enumerate() {
                    let child = display.add_child(parent, position.to_string());
                    worklist.push(Pending::Event(child, event));
                }
            }
            Pending::Event(parent, event) => {
                for (field, value) in event.fields() {
                    display.add_child(parent, format!("{}: {}", field, value));
                }
            }
        }
    }

    display
}
