//! Lazily growing iteration over a queue of sources.
//!
//! A `Worklist` drains its sources front to back. New sources can be
//! enqueued at any time, even while an earlier source is only half
//! consumed; they are visited once everything queued before them is
//! exhausted. This lets a consumer discover new work (e.g. a nested branch
//! of a tree) while walking existing work, without recursion.

use std::collections::VecDeque;
use std::fmt;

/// FIFO of source cursors
///
/// Not thread-safe; meant to be driven by a single consumer.
pub struct Worklist<'a, T> {
    sources: VecDeque<Box<dyn Iterator<Item = T> + 'a>>,
}

impl<'a, T> Worklist<'a, T> {
    /// Create an empty worklist
    pub fn new() -> Self {
        Self {
            sources: VecDeque::new(),
        }
    }

    /// Create a worklist from zero or more sources, drained in the given order
    pub fn from_sources<S, I>(sources: S) -> Self
    where
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        let mut worklist = Self::new();
        for source in sources {
            worklist.extend(source);
        }
        worklist
    }

    /// Append a source to the back of the queue
    pub fn extend<I>(&mut self, source: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        self.sources.push_back(Box::new(source.into_iter()));
        self
    }

    /// Append a single-element source
    pub fn push(&mut self, item: T) -> &mut Self
    where
        T: 'a,
    {
        self.extend(std::iter::once(item))
    }

    /// Number of sources not yet fully drained
    pub fn pending_sources(&self) -> usize {
        self.sources.len()
    }
}

impl<T> Default for Worklist<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Iterator for Worklist<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let front = self.sources.front_mut()?;
            if let Some(item) = front.next() {
                return Some(item);
            }
            self.sources.pop_front();
        }
    }
}

impl<T> fmt::Debug for Worklist<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worklist")
            .field("pending_sources", &self.sources.len())
            .finish()
    }
}
