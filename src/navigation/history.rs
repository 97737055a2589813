//! Session history stack.
//!
//! # Responsibilities
//! - Record committed locations in order
//! - Move a cursor backward and forward through them
//!
//! # Design Decisions
//! - Push discards entries ahead of the cursor
//! - Bounded: the oldest entry is dropped when capacity is reached
//! - Moving the cursor only proposes a location; the caller commits it
//!   after resolution succeeds

use std::collections::VecDeque;

use crate::navigation::location::Location;

/// Bounded history of committed locations.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Location>,
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Create a history holding the start location.
    pub fn new(start: Location, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.min(64));
        entries.push_back(start);
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.cursor]
    }

    /// Append a location after the cursor, discarding forward entries.
    pub fn push(&mut self, location: Location) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(location);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Overwrite the entry under the cursor.
    pub fn replace(&mut self, location: Location) {
        self.entries[self.cursor] = location;
    }

    /// The location `delta` steps from the cursor, if it exists.
    pub fn peek(&self, delta: isize) -> Option<&Location> {
        let target = self.cursor.checked_add_signed(delta)?;
        self.entries.get(target)
    }

    /// Move the cursor by `delta`; returns false if out of range.
    pub fn go(&mut self, delta: isize) -> bool {
        match self.cursor.checked_add_signed(delta) {
            Some(target) if target < self.entries.len() => {
                self.cursor = target;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(path: &str) -> Location {
        Location::root().with_path(path)
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = History::new(loc("/"), 10);
        history.push(loc("/a"));
        history.push(loc("/b"));
        assert!(history.go(-2));
        assert_eq!(history.current().path, "/");

        history.push(loc("/c"));
        let paths: Vec<&str> = history.entries().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/c"]);
        assert!(history.peek(1).is_none());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(loc("/"), 2);
        history.push(loc("/a"));
        history.push(loc("/b"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().path, "/b");
        assert_eq!(history.peek(-1).map(|l| l.path.as_str()), Some("/a"));
        assert!(history.peek(-2).is_none());
    }

    #[test]
    fn test_replace_and_bounds() {
        let mut history = History::new(loc("/"), 5);
        history.replace(loc("/x"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().path, "/x");
        assert!(!history.go(-1));
        assert!(!history.go(1));
        assert_eq!(history.position(), 0);
    }
}
