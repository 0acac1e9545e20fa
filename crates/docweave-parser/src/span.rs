//! Byte ranges in source unit text.

use std::ops::Range;

/// A half-open byte range into the text of a source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// The span of the character at a 1-based `line` and `column` of `text`,
    /// clamped to the text.
    pub fn at_line_column(text: &str, line: usize, column: usize) -> Self {
        let line_start: usize = text
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        let mut start = (line_start + column.saturating_sub(1)).min(text.len());
        while !text.is_char_boundary(start) {
            start -= 1;
        }
        let end = text[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both.
    pub fn union(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(3..8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert_eq!(span.union(Span::new(10..12)), Span::new(3..12));
    }

    #[test]
    fn test_at_line_column() {
        let text = "{\n  \"nodes\": x\n}";
        let span = Span::at_line_column(text, 2, 12);

        assert_eq!(&text[span.start()..span.end()], "x");
    }

    #[test]
    fn test_at_line_column_clamps_to_text() {
        let text = "{}";
        let span = Span::at_line_column(text, 5, 40);

        assert_eq!(span, Span::new(2..2));
        assert!(span.is_empty());
    }

    proptest! {
        #[test]
        fn test_at_line_column_stays_on_char_boundaries(
            text in "[a-zé\n{}\"]{0,40}",
            line in 0usize..6,
            column in 0usize..20,
        ) {
            let span = Span::at_line_column(&text, line, column);

            prop_assert!(span.end() <= text.len());
            prop_assert!(text.is_char_boundary(span.start()));
            prop_assert!(text.is_char_boundary(span.end()));
        }
    }
}
