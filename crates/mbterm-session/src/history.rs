//! Command history with arrow-key style recall.

/// Submitted lines plus a recall cursor.
///
/// The cursor ranges over `0..=len`; `len` is the "end" slot, an empty
/// input line below the newest entry.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submission and move the cursor to the end. Blank
    /// submissions are not recorded but still reset the cursor.
    pub fn record(&mut self, line: &str) {
        if !line.trim().is_empty() {
            self.entries.push(line.to_string());
        }
        self.cursor = self.entries.len();
    }

    /// Step back one entry. `None` when already at the oldest entry (or the
    /// history is empty); the cursor does not move in that case.
    pub fn prev(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].as_str())
    }

    /// Step forward one entry. Reaching (or already being at) the end slot
    /// yields an empty line.
    pub fn next(&mut self) -> &str {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        self.entries
            .get(self.cursor)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(entries: &[&str]) -> HistoryNavigator {
        let mut h = HistoryNavigator::new();
        for e in entries {
            h.record(e);
        }
        h
    }

    #[test]
    fn empty_history() {
        let mut h = HistoryNavigator::new();
        assert_eq!(h.prev(), None);
        assert_eq!(h.next(), "");
        assert!(h.at_end());
    }

    #[test]
    fn prev_walks_back_then_stops() {
        let mut h = with(&["LIST", "RUN"]);
        assert_eq!(h.prev(), Some("RUN"));
        assert_eq!(h.prev(), Some("LIST"));
        assert_eq!(h.prev(), None);
        assert_eq!(h.cursor(), 0);
    }

    #[test]
    fn next_returns_to_empty_line() {
        let mut h = with(&["LIST", "RUN"]);
        h.prev();
        h.prev();
        assert_eq!(h.next(), "RUN");
        assert_eq!(h.next(), "");
        assert!(h.at_end());
        assert_eq!(h.next(), "");
        assert!(h.at_end());
    }

    #[test]
    fn record_resets_cursor() {
        let mut h = with(&["A", "B", "C"]);
        h.prev();
        h.prev();
        h.record("D");
        assert!(h.at_end());
        assert_eq!(h.prev(), Some("D"));
    }

    #[test]
    fn blank_lines_not_recorded() {
        let mut h = with(&["A"]);
        h.prev();
        h.record("   ");
        assert_eq!(h.entries().len(), 1);
        assert!(h.at_end());
    }

    #[test]
    fn raw_text_is_kept() {
        let h = with(&["  10 print x  "]);
        assert_eq!(h.entries()[0], "  10 print x  ");
    }

    #[test]
    fn duplicates_are_kept() {
        let h = with(&["RUN", "RUN"]);
        assert_eq!(h.entries().len(), 2);
    }

    #[test]
    fn navigation_does_not_mutate() {
        let mut h = with(&["A", "B"]);
        let before = h.entries().to_vec();
        h.prev();
        h.next();
        h.prev();
        assert_eq!(h.entries(), before.as_slice());
    }
}
