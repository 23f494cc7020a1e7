//! Build a trace index from an ordered stream of events.
//!
//! Events are grouped by `(pid, file, func)` scope and then by address.
//! A relocation record moves the whole history of its `from` address to
//! its `to` address inside the same scope, so later lookups always go
//! through the current filing of a block.

use super::history::EventHistory;
use super::index::TraceIndex;
use crate::parser::{Address, Event, Key, Relocation};
use crate::tree::{insert_path, Branch, Tree};
use log::debug;
use std::collections::BTreeMap;

/// Grouping scope of an event
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope {
    pub pid: Key,
    pub file: Key,
    pub func: Key,
}

impl Scope {
    pub fn of(event: &Event) -> Self {
        Self {
            pid: event.pid.clone(),
            file: event.file.clone(),
            func: event.func.clone(),
        }
    }
}

/// Incremental trace index builder
///
/// Each scope owns its own address map; a relocation only ever touches
/// the two addresses of one scope.
#[derive(Debug, Default)]
pub struct TraceBuilder {
    scopes: BTreeMap<Scope, BTreeMap<Key, EventHistory>>,
    events: usize,
    relocations: usize,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one event, in ingestion order
    pub fn ingest(&mut self, event: Event) {
        self.events += 1;
        let addresses = self.scopes.entry(Scope::of(&event)).or_default();

        match event.address.clone() {
            Address::Scalar(address) => {
                addresses.entry(address).or_default().record(event);
            }
            Address::Relocation(Relocation { from, to }) => {
                self.relocations += 1;

                // Unknown `from` just starts a fresh history
                let mut history = addresses.remove(&from).unwrap_or_default();
                if let Some(older) = addresses.remove(&to) {
                    history.append_older(older);
                }
                history.record(event);
                addresses.insert(to, history);
            }
        }
    }

    /// Current history of an address within a scope
    #[cfg(test)]
    fn history(&self, scope: &Scope, address: &Key) -> Option<&EventHistory> {
        self.scopes.get(scope)?.get(address)
    }

    /// Nest the scopes into `pid → file → func → address` and return the index
    pub fn finish(self) -> TraceIndex {
        debug!(
            "Finishing trace: {} events, {} relocations, {} scopes",
            self.events,
            self.relocations,
            self.scopes.len()
        );

        let mut root = Branch::new();
        for (scope, addresses) in self.scopes {
            for (address, history) in addresses {
                let path = [
                    scope.pid.to_string(),
                    scope.file.to_string(),
                    scope.func.to_string(),
                    address.to_string(),
                ];
                insert_path(&mut root, &path, Tree::Leaf(history));
            }
        }

        TraceIndex::fresh(root)
    }
}

impl Extend<Event> for TraceBuilder {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.ingest(event);
        }
    }
}

/// Build a trace index from events in ingestion order
///
/// **Public** - main entry point for index building
pub fn build_index<I>(events: I) -> TraceIndex
where
    I: IntoIterator<Item = Event>,
{
    let mut builder = TraceBuilder::new();
    builder.extend(events);
    builder.finish()
}
