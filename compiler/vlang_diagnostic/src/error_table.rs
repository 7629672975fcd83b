//! Accumulated errors of one run.
//!
//! Every stage appends to the same table and keeps going; the table is
//! reported once at the end.

use std::fmt;

use thiserror::Error;

/// Which stage produced an error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 4] = [
        ErrorKind::Lexical,
        ErrorKind::Syntax,
        ErrorKind::Semantic,
        ErrorKind::Runtime,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Lexical => "Lexical",
            ErrorKind::Syntax => "Syntax",
            ErrorKind::Semantic => "Semantic",
            ErrorKind::Runtime => "Runtime",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the table.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
#[error("{kind} error at {line}:{column}: {message}")]
pub struct ErrorEntry {
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub kind: ErrorKind,
}

/// Count of entries per kind.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ErrorSummary {
    pub lexical: usize,
    pub syntax: usize,
    pub semantic: usize,
    pub runtime: usize,
}

impl ErrorSummary {
    pub fn total(&self) -> usize {
        self.lexical + self.syntax + self.semantic + self.runtime
    }
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s): {} lexical, {} syntax, {} semantic, {} runtime",
            self.total(),
            self.lexical,
            self.syntax,
            self.semantic,
            self.runtime
        )
    }
}

/// Ordered collection of [`ErrorEntry`] rows.
#[derive(Clone, Default, Debug)]
pub struct ErrorTable {
    entries: Vec<ErrorEntry>,
}

impl ErrorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ErrorKind, line: u32, column: u32, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%kind, line, column, %message, "error recorded");
        self.entries.push(ErrorEntry {
            line,
            column,
            message,
            kind,
        });
    }

    pub fn add_semantic(&mut self, line: u32, column: u32, message: impl Into<String>) {
        self.add(ErrorKind::Semantic, line, column, message);
    }

    pub fn add_runtime(&mut self, line: u32, column: u32, message: impl Into<String>) {
        self.add(ErrorKind::Runtime, line, column, message);
    }

    pub fn entries(&self) -> &[ErrorEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Entries of one kind, in insertion order.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn summary(&self) -> ErrorSummary {
        let mut summary = ErrorSummary::default();
        for entry in &self.entries {
            match entry.kind {
                ErrorKind::Lexical => summary.lexical += 1,
                ErrorKind::Syntax => summary.syntax += 1,
                ErrorKind::Semantic => summary.semantic += 1,
                ErrorKind::Runtime => summary.runtime += 1,
            }
        }
        summary
    }

    /// Move every entry of `other` to the end of this table.
    pub fn append(&mut self, other: &mut ErrorTable) {
        self.entries.append(&mut other.entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Render as a fixed-width text table followed by the summary line.
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(out, "{:<4} {:<10} {:>5} {:>6}  MESSAGE", "#", "KIND", "LINE", "COLUMN");
        for (i, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<4} {:<10} {:>5} {:>6}  {}",
                i + 1,
                entry.kind.as_str(),
                entry.line,
                entry.column,
                entry.message
            );
        }
        let _ = write!(out, "{}", self.summary());
        out
    }
}

impl<'a> IntoIterator for &'a ErrorTable {
    type Item = &'a ErrorEntry;
    type IntoIter = std::slice::Iter<'a, ErrorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_counts_by_kind() {
        let mut table = ErrorTable::new();
        table.add_semantic(1, 1, "undefined variable 'x'");
        table.add_semantic(2, 4, "type mismatch");
        table.add_runtime(3, 9, "index 3 out of range");
        table.add(ErrorKind::Syntax, 4, 1, "expected `}`");

        let summary = table.summary();
        assert_eq!(summary.semantic, 2);
        assert_eq!(summary.runtime, 1);
        assert_eq!(summary.syntax, 1);
        assert_eq!(summary.lexical, 0);
        assert_eq!(summary.total(), 4);
        assert!(table.has_kind(ErrorKind::Runtime));
        assert!(!table.has_kind(ErrorKind::Lexical));
    }

    #[test]
    fn entry_display() {
        let entry = ErrorEntry {
            line: 3,
            column: 7,
            message: "break must be inside a loop or switch".into(),
            kind: ErrorKind::Semantic,
        };
        assert_eq!(
            entry.to_string(),
            "Semantic error at 3:7: break must be inside a loop or switch"
        );
    }

    #[test]
    fn render_lists_rows_then_summary() {
        let mut table = ErrorTable::new();
        table.add_semantic(2, 5, "boom");
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Semantic"));
        assert!(lines[1].ends_with("boom"));
        assert_eq!(
            lines[2],
            "1 error(s): 0 lexical, 0 syntax, 1 semantic, 0 runtime"
        );
    }

    #[test]
    fn append_moves_entries() {
        let mut front = ErrorTable::new();
        front.add(ErrorKind::Lexical, 1, 1, "bad char");
        let mut table = ErrorTable::new();
        table.append(&mut front);
        assert!(front.is_empty());
        assert_eq!(table.len(), 1);
        assert_eq!(table.of_kind(ErrorKind::Lexical).count(), 1);
    }
}
