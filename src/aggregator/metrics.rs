//! Outstanding-memory statistics per scope.

use crate::trace::EventHistory;
use crate::tree::{decompose, Branch, Tree};
use crate::utils::config::TRACE_DEPTH;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outstanding allocations of one `(pid, file, func)` scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeLeak {
    pub pid: String,
    pub file: String,
    pub func: String,
    /// Addresses whose most recent event is live
    pub addresses: usize,
    /// Sum of the most recent sizes of those addresses
    pub bytes: i128,
}

/// Outstanding allocations across a tree, largest scope first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeakSummary {
    pub scopes: Vec<ScopeLeak>,
    pub total_addresses: usize,
    pub total_bytes: i128,
}

/// Group outstanding address histories by scope
///
/// Works on the full index or any filtered view of it; histories whose
/// most recent event is a free are ignored.
pub fn summarize_leaks(tree: &Branch<EventHistory>) -> LeakSummary {
    let mut by_scope: BTreeMap<(String, String, String), (usize, i128)> = BTreeMap::new();

    let leaves = decompose(tree, |path, _, node| {
        path.len() == TRACE_DEPTH
            && matches!(node, Tree::Leaf(history) if history.is_outstanding())
    });

    for (path, node) in leaves {
        let Tree::Leaf(history) = node else {
            continue;
        };
        let scope = (path[0].clone(), path[1].clone(), path[2].clone());
        let entry = by_scope.entry(scope).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(history.outstanding_bytes());
    }

    let mut scopes: Vec<ScopeLeak> = by_scope
        .into_iter()
        .map(|((pid, file, func), (addresses, bytes))| ScopeLeak {
            pid,
            file,
            func,
            addresses,
            bytes,
        })
        .collect();

    // Largest first; ties keep scope order
    scopes.sort_by(|a, b| b.bytes.cmp(&a.bytes));

    LeakSummary {
        total_addresses: scopes.iter().map(|s| s.addresses).sum(),
        total_bytes: scopes
            .iter()
            .fold(0, |total: i128, s| total.saturating_add(s.bytes)),
        scopes,
    }
}

/// Render a summary table
pub fn render_summary(summary: &LeakSummary, max_rows: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  {}", "OUTSTANDING ALLOCATIONS".bold()));
    lines.push(format!(
        "  {:<8} {:<28} {:<28} {:>9} {:>12}",
        "PID", "FILE", "FUNC", "ADDRS", "BYTES"
    ));
    lines.push(format!("  {}", "-".repeat(89)));

    for scope in summary.scopes.iter().take(max_rows) {
        lines.push(format!(
            "  {:<8} {:<28} {:<28} {:>9} {:>12}",
            scope.pid,
            truncate(&scope.file, 28),
            truncate(&scope.func, 28),
            scope.addresses,
            scope.bytes.to_string().red()
        ));
    }

    lines.push(format!("  {}", "-".repeat(89)));
    lines.push(format!(
        "  {:<66} {:>9} {:>12}",
        "TOTAL",
        summary.total_addresses,
        summary.total_bytes.to_string().bold()
    ));

    if summary.scopes.len() > max_rows {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} scopes)",
            max_rows,
            summary.scopes.len()
        ));
    }

    lines.join("\n")
}

/// Keep the tail of long names, which is usually the distinguishing part
fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - (width - 3)).collect();
    format!("...{}", tail)
}
