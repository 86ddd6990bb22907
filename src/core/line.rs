//! Transcript lines
//!
//! A `HistoryLine` is one entry in the terminal transcript. Its kind only
//! selects styling; content may span several rows (ASCII art, help text).

/// Line kind (controls styling only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Echo of a submitted command
    Input,
    /// Normal command output
    Output,
    /// Boot log and informational messages
    System,
    /// Unknown commands and invalid arguments
    Error,
    /// Confirmations and easter egg announcements
    Success,
}

impl LineKind {
    #[allow(dead_code)]
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Input => "input",
            LineKind::Output => "output",
            LineKind::System => "system",
            LineKind::Error => "error",
            LineKind::Success => "success",
        }
    }
}

/// A single rendered line of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub kind: LineKind,
    pub content: String,
}

impl HistoryLine {
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn input(content: impl Into<String>) -> Self {
        Self::new(LineKind::Input, content)
    }

    pub fn output(content: impl Into<String>) -> Self {
        Self::new(LineKind::Output, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(LineKind::System, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(LineKind::Error, content)
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self::new(LineKind::Success, content)
    }

    /// Iterate over the physical rows of a multi-line entry
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_split_on_newline() {
        let line = HistoryLine::output("one\ntwo\n\nfour");
        let rows: Vec<&str> = line.rows().collect();
        assert_eq!(rows, vec!["one", "two", "", "four"]);
    }

    #[test]
    fn test_single_row() {
        let line = HistoryLine::error("nope");
        assert_eq!(line.rows().count(), 1);
        assert_eq!(line.kind, LineKind::Error);
        assert_eq!(line.kind.as_str(), "error");
    }
}
