//! Byte offset to line/column conversion.

use vlang_ir::Span;

/// Pre-computed line starts for one source file.
///
/// Lookups binary-search the line table; columns count characters, not
/// bytes, so multi-byte text reports the column a reader would expect.
#[derive(Clone, Debug, Default)]
pub struct LineIndex {
    source: String,
    /// Byte offset of each line start; `line_starts[0] == 0`.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineIndex {
            source: source.to_owned(),
            line_starts,
        }
    }

    /// 1-based line containing `offset`.
    pub fn line(&self, offset: u32) -> u32 {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(idx + 1).unwrap_or(u32::MAX)
    }

    /// 1-based `(line, column)` of `offset`.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line(offset);
        let start = self
            .line_starts
            .get(line as usize - 1)
            .copied()
            .unwrap_or(0) as usize;
        let end = (offset as usize).min(self.source.len());
        let column = self
            .source
            .get(start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(column + 1).unwrap_or(u32::MAX))
    }

    /// Position of the first byte of `span`.
    #[inline]
    pub fn span_start(&self, span: Span) -> (u32, u32) {
        self.line_col(span.start)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let index = LineIndex::new("mut x int = 5");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(4), (1, 5));
    }

    #[test]
    fn offsets_after_newlines() {
        let source = "a\nbc\n\nd";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(2), (2, 1));
        assert_eq!(index.line_col(3), (2, 2));
        assert_eq!(index.line_col(5), (3, 1));
        assert_eq!(index.line_col(6), (4, 1));
    }

    #[test]
    fn columns_count_characters() {
        let index = LineIndex::new("s = \"ñandú\" + x");
        // `+` is preceded by two 2-byte characters.
        assert_eq!(index.line_col(14), (1, 13));
    }

    #[test]
    fn offset_past_end_is_clamped() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(10), (1, 3));
    }
}
