//! Per-address event history.

use crate::parser::Event;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Events recorded for one address, newest first
///
/// The front element is always the most recent state of the address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventHistory(VecDeque<Event>);

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new event as the most recent one
    pub fn record(&mut self, event: Event) {
        self.0.push_front(event);
    }

    /// Append an older history behind everything recorded so far
    pub fn append_older(&mut self, mut older: EventHistory) {
        self.0.append(&mut older.0);
    }

    /// Most recent event
    pub fn latest(&self) -> Option<&Event> {
        self.0.front()
    }

    /// Whether the most recent event leaves the allocation outstanding
    pub fn is_outstanding(&self) -> bool {
        self.latest().is_some_and(Event::is_live)
    }

    /// Bytes still held according to the most recent event
    pub fn outstanding_bytes(&self) -> i128 {
        self.latest().map_or(0, |event| event.size)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Events from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.0.iter()
    }
}

impl FromIterator<Event> for EventHistory {
    /// Events are taken oldest first, as they would be recorded
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut history = EventHistory::new();
        for event in iter {
            history.record(event);
        }
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Address, Key};

    fn event(line: i64, size: i128) -> Event {
        Event {
            pid: Key::new("1"),
            file: Key::new("a.c"),
            func: Key::new("f"),
            line,
            address: Address::Scalar(Key::new("0x1")),
            size,
        }
    }

    #[test]
    fn test_record_puts_newest_first() {
        let mut history = EventHistory::new();
        history.record(event(10, 8));
        history.record(event(20, 0));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|e| e.line), Some(20));
        assert!(!history.is_outstanding());
    }

    #[test]
    fn test_append_older_goes_behind() {
        let mut newer: EventHistory = vec![event(30, 16)].into_iter().collect();
        let older: EventHistory = vec![event(10, 8), event(20, 0)].into_iter().collect();
        newer.append_older(older);

        let lines: Vec<i64> = newer.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![30, 20, 10]);
        assert_eq!(newer.outstanding_bytes(), 16);
    }

    #[test]
    fn test_empty_history_is_not_outstanding() {
        let history = EventHistory::new();
        assert!(history.is_empty());
        assert!(!history.is_outstanding());
        assert_eq!(history.outstanding_bytes(), 0);
    }
}
