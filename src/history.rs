//! Command history for termfolio
//!
//! Stores submitted commands and provides Up/Down recall.

/// Maximum number of history entries
const HISTORY_LIMIT: usize = 1000;

/// Result of a Down-arrow recall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall<'a> {
    /// Cursor moved to this entry
    Entry(&'a str),
    /// Cursor left the history; input should be emptied
    Cleared,
    /// Already at the newest position
    Unchanged,
}

/// Submitted commands with a recall cursor
pub struct CommandHistoryLog {
    /// All entries (newest last)
    entries: Vec<String>,
    /// Offset from the newest entry while navigating; `None` when not navigating
    cursor: Option<usize>,
    /// Maximum entries
    max_entries: usize,
}

impl Default for CommandHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistoryLog {
    /// Create an empty history
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            max_entries: max_entries.max(1),
        }
    }

    /// Add a command and stop navigating
    pub fn push(&mut self, command: &str) {
        self.entries.push(command.to_string());

        // Trim if exceeding limit
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }

        self.cursor = None;
    }

    /// Step toward older entries, clamped at the oldest
    pub fn up(&mut self) -> Option<&str> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entry_at(next)
    }

    /// Step toward newer entries, leaving navigation past the newest
    pub fn down(&mut self) -> Recall<'_> {
        match self.cursor {
            None => Recall::Unchanged,
            Some(0) => {
                self.cursor = None;
                Recall::Cleared
            }
            Some(c) => {
                self.cursor = Some(c - 1);
                match self.entry_at(c - 1) {
                    Some(entry) => Recall::Entry(entry),
                    None => Recall::Cleared,
                }
            }
        }
    }

    /// Cursor as a signed index, `-1` when not navigating
    #[allow(dead_code)]
    pub fn index(&self) -> isize {
        self.cursor.map_or(-1, |c| c as isize)
    }

    /// Entries, oldest first
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Get entry count
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_at(&self, offset: usize) -> Option<&str> {
        let idx = self.entries.len().checked_sub(1 + offset)?;
        self.entries.get(idx).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(items: &[&str]) -> CommandHistoryLog {
        let mut log = CommandHistoryLog::new();
        for item in items {
            log.push(item);
        }
        log
    }

    #[test]
    fn test_up_walks_to_oldest_and_clamps() {
        let mut log = history(&["help", "about"]);

        assert_eq!(log.up(), Some("about"));
        assert_eq!(log.up(), Some("help"));
        assert_eq!(log.up(), None);
        assert_eq!(log.index(), 1);
    }

    #[test]
    fn test_down_returns_to_empty() {
        let mut log = history(&["help", "about"]);
        log.up();
        log.up();

        assert_eq!(log.down(), Recall::Entry("about"));
        assert_eq!(log.down(), Recall::Cleared);
        assert_eq!(log.index(), -1);
        assert_eq!(log.down(), Recall::Unchanged);
    }

    #[test]
    fn test_down_without_navigation_is_noop() {
        let mut log = history(&["help"]);
        assert_eq!(log.down(), Recall::Unchanged);
        assert_eq!(log.index(), -1);
    }

    #[test]
    fn test_up_on_empty_history() {
        let mut log = CommandHistoryLog::new();
        assert_eq!(log.up(), None);
        assert_eq!(log.index(), -1);
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut log = history(&["help", "about"]);
        log.up();
        log.push("skills");
        assert_eq!(log.index(), -1);
        assert_eq!(log.up(), Some("skills"));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut log = CommandHistoryLog::with_limit(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.entries(), &["b".to_string(), "c".to_string()]);
        assert_eq!(log.len(), 2);
    }
}
