//! Command history with arrow-key recall

/// Lines entered at one privilege level, plus a recall cursor.
///
/// The cursor counts entries back from the newest: 0 means nothing is
/// recalled, 1 is the last line entered. Moving past either end clamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entered line and reset the cursor.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push(line.into());
        self.cursor = 0;
    }

    /// Recall the previous (older) line.
    pub fn up(&mut self) -> &str {
        self.cursor = (self.cursor + 1).min(self.entries.len());
        self.current()
    }

    /// Recall the next (newer) line; at the bottom this is the empty line.
    pub fn down(&mut self) -> &str {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn current(&self) -> &str {
        match self.cursor {
            0 => "",
            n => &self.entries[self.entries.len() - n],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_walks_back_and_clamps() {
        let mut history = CommandHistory::new();
        history.push("ls");
        history.push("pwd");

        assert_eq!(history.up(), "pwd");
        assert_eq!(history.up(), "ls");
        assert_eq!(history.up(), "ls");
    }

    #[test]
    fn test_down_returns_to_empty_line() {
        let mut history = CommandHistory::new();
        history.push("ls");
        history.push("pwd");
        history.up();
        history.up();

        assert_eq!(history.down(), "pwd");
        assert_eq!(history.down(), "");
        assert_eq!(history.down(), "");
    }

    #[test]
    fn test_empty_history_never_panics() {
        let mut history = CommandHistory::new();
        assert_eq!(history.up(), "");
        assert_eq!(history.down(), "");
    }

    #[test]
    fn test_push_resets_cursor() {
        let mut history = CommandHistory::new();
        history.push("a");
        history.up();
        history.push("b");
        assert_eq!(history.up(), "b");
    }
}
