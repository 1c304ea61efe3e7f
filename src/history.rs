//! Bounded history ring with a scratch slot for the in-progress line.

use std::collections::VecDeque;

const DEFAULT_MAX: usize = 31;
const HARD_MAX: usize = 255;

pub struct History {
    entries: VecDeque<String>,
    max: usize,
    /// `None` while browsing nothing (cursor sits past the newest entry);
    /// `Some(i)` while `entries[i]` is on screen; the text the user was
    /// editing before history browsing began lives in `scratch`.
    cursor: Option<usize>,
    scratch: Vec<u8>,
}

impl History {
    pub fn new() -> History {
        History {
            entries: VecDeque::new(),
            max: DEFAULT_MAX,
            cursor: None,
            scratch: Vec::new(),
        }
    }

    /// Sets the maximum number of retained entries, clamped to `0..=255`.
    pub fn set_max(&mut self, requested: usize) -> usize {
        let clamped = requested.min(HARD_MAX);
        self.max = clamped;
        while self.entries.len() > self.max {
            self.entries.pop_front();
        }
        clamped
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.scratch.clear();
    }

    /// Resets browsing state without touching the stored entries, used
    /// when a Ctrl-C cancel discards the in-progress edit line a
    /// history browse was using as its scratch text.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
        self.scratch.clear();
    }

    /// Pushes a committed, non-empty line unless it duplicates the most
    /// recent entry. Resets browsing state.
    pub fn push(&mut self, line: &str) {
        self.cursor = None;
        self.scratch.clear();
        if line.is_empty() || self.max == 0 {
            return;
        }
        if self.entries.back().map(|s| s.as_str()) == Some(line) {
            return;
        }
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.max {
            self.entries.pop_front();
        }
    }

    /// Moves to the previous (older) entry, saving `current` as the
    /// scratch text the first time browsing starts.
    pub fn prev(&mut self, current: &[u8]) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        match self.cursor {
            None => {
                self.scratch = current.to_vec();
                self.cursor = Some(self.entries.len() - 1);
            }
            Some(0) => return None,
            Some(i) => self.cursor = Some(i - 1),
        }
        self.cursor.map(move |i| self.entries[i].as_str())
    }

    /// Moves to the next (newer) entry, or restores the scratch text once
    /// past the newest entry.
    pub fn next(&mut self) -> Option<Vec<u8>> {
        match self.cursor {
            None => None,
            Some(i) if i + 1 < self.entries.len() => {
                self.cursor = Some(i + 1);
                Some(self.entries[i + 1].as_bytes().to_vec())
            }
            Some(_) => {
                self.cursor = None;
                Some(std::mem::take(&mut self.scratch))
            }
        }
    }

    /// Jumps to the oldest entry (PageUp-style), without touching scratch.
    pub fn first(&mut self, current: &[u8]) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor.is_none() {
            self.scratch = current.to_vec();
        }
        self.cursor = Some(0);
        Some(self.entries[0].as_str())
    }

    /// Jumps to the newest entry (PageDown-style), without touching scratch.
    pub fn last(&mut self, current: &[u8]) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor.is_none() {
            self.scratch = current.to_vec();
        }
        let i = self.entries.len() - 1;
        self.cursor = Some(i);
        Some(self.entries[i].as_str())
    }
}

impl Default for History {
    fn default() -> History {
        History::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_and_adjacent_duplicates() {
        let mut h = History::new();
        h.push("");
        assert_eq!(h.len(), 0);
        h.push("ls");
        h.push("ls");
        assert_eq!(h.len(), 1);
        h.push("pwd");
        h.push("ls");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn evicts_oldest_past_max() {
        let mut h = History::new();
        h.set_max(2);
        h.push("a");
        h.push("b");
        h.push("c");
        let all: Vec<_> = h.iter().cloned().collect();
        assert_eq!(all, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn browsing_saves_and_restores_scratch() {
        let mut h = History::new();
        h.push("first");
        h.push("second");
        assert_eq!(h.prev(b"unsent"), Some("second"));
        assert_eq!(h.prev(b"unsent"), Some("first"));
        assert_eq!(h.prev(b"unsent"), None);
        assert_eq!(h.next(), Some(b"second".to_vec()));
        assert_eq!(h.next(), Some(b"unsent".to_vec()));
    }

    #[test]
    fn reset_cursor_drops_in_progress_browse() {
        let mut h = History::new();
        h.push("first");
        h.push("second");
        h.prev(b"unsent");
        h.reset_cursor();
        assert_eq!(h.prev(b"fresh"), Some("second"));
        assert_eq!(h.next(), Some(b"fresh".to_vec()));
    }

    #[test]
    fn set_max_clamps_to_hard_limit() {
        let mut h = History::new();
        assert_eq!(h.set_max(10_000), HARD_MAX);
    }

    proptest! {
        #[test]
        fn length_bounded_and_no_adjacent_duplicates(lines in proptest::collection::vec("[a-c]{1,3}", 0..40), max in 0usize..10) {
            let mut h = History::new();
            h.set_max(max);
            for l in &lines {
                h.push(l);
            }
            prop_assert!(h.len() <= max);
            let all: Vec<&String> = h.iter().collect();
            for w in all.windows(2) {
                prop_assert_ne!(w[0], w[1]);
            }
        }
    }
}
