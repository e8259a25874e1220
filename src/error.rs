//! Diagnostics: the single error type and its two renderings.
//!
//! An [`EvaluationError`] keeps the whole input together with the
//! highlighted ranges, so it can be rendered after the evaluation
//! that produced it has finished. [`EvaluationError::full`] never
//! truncates; [`EvaluationError::pretty`] fits the source line into
//! [`PRETTY_COLUMNS`] columns around the highlighted ranges.

use std::sync::{Arc, OnceLock};

use crate::token::Token;

/// Column budget of [`EvaluationError::pretty`].
pub const PRETTY_COLUMNS: usize = 48;

const ELLIPSIS: char = '…';
const PRIMARY_MARK: char = '^';
const SECONDARY_MARK: char = '~';

/// A highlighted range of the input.
///
/// Primary groups mark the exact fault; secondary groups mark the
/// operands around it for context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HighlightGroup {
    pub start: usize,
    pub end: usize,
    pub primary: bool,
}

impl HighlightGroup {
    #[must_use]
    pub const fn primary(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            primary: true,
        }
    }

    #[must_use]
    pub const fn secondary(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            primary: false,
        }
    }

    /// Displayed extent; empty groups still take one column.
    const fn display_end(&self) -> usize {
        if self.end > self.start {
            self.end
        } else {
            self.start + 1
        }
    }
}

/// Error raised by any stage of evaluation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at column {}", first_column(.highlights))]
pub struct EvaluationError {
    input: Arc<[char]>,
    highlights: Vec<HighlightGroup>,
    message: String,
    full: OnceLock<String>,
    pretty: OnceLock<String>,
}

impl EvaluationError {
    /// Create an error over `input` with the given highlights.
    ///
    /// Highlights are kept in source order.
    #[must_use]
    pub fn new(
        input: Arc<[char]>,
        mut highlights: Vec<HighlightGroup>,
        message: impl Into<String>,
    ) -> Self {
        highlights.sort_unstable();
        let message = message.into();
        log::debug!("diagnostic raised: {message} ({} highlights)", highlights.len());
        Self {
            input,
            highlights,
            message,
            full: OnceLock::new(),
            pretty: OnceLock::new(),
        }
    }

    /// Error whose primary highlight covers one token.
    #[must_use]
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        Self::new(
            Arc::clone(&token.source),
            vec![HighlightGroup::primary(token.start, token.end)],
            message,
        )
    }

    /// Error over an illegal pair: `first` for context, `second` as
    /// the fault.
    #[must_use]
    pub fn at_pair(first: &Token, second: &Token, message: impl Into<String>) -> Self {
        Self::new(
            Arc::clone(&second.source),
            vec![
                HighlightGroup::secondary(first.start, first.end),
                HighlightGroup::primary(second.start, second.end),
            ],
            message,
        )
    }

    /// Error at an operator, with both operands shown for context.
    #[must_use]
    pub fn at_operator(
        lhs: &Token,
        operator: &Token,
        rhs: &Token,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            Arc::clone(&operator.source),
            vec![
                HighlightGroup::secondary(lhs.start, lhs.end),
                HighlightGroup::primary(operator.start, operator.end),
                HighlightGroup::secondary(rhs.start, rhs.end),
            ],
            message,
        )
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn highlights(&self) -> &[HighlightGroup] {
        &self.highlights
    }

    /// The complete original input.
    #[must_use]
    pub fn input(&self) -> String {
        self.input.iter().collect()
    }

    /// Unabridged rendering: message, the whole input, and markers.
    ///
    /// The input is reproduced character for character. Tabs are
    /// mirrored into the marker line so markers stay aligned.
    #[must_use]
    pub fn full(&self) -> &str {
        self.full
            .get_or_init(|| self.render(0, self.input.len(), Layout::Verbatim))
    }

    /// Rendering whose source line fits in [`PRETTY_COLUMNS`].
    #[must_use]
    pub fn pretty(&self) -> &str {
        self.pretty.get_or_init(|| self.pretty_within(PRETTY_COLUMNS))
    }

    /// Rendering whose source line fits in `columns` columns.
    ///
    /// Inputs longer than the budget are windowed around the
    /// highlighted ranges, with `…` marking each truncated side.
    /// Whitespace is shown as plain spaces. Budgets below three
    /// columns are raised to three.
    #[must_use]
    pub fn pretty_within(&self, columns: usize) -> String {
        let (from, to) = self.window(columns);
        self.render(from, to, Layout::Flattened)
    }

    fn window(&self, columns: usize) -> (usize, usize) {
        let len = self.input.len();
        let columns = columns.max(3);
        if len <= columns {
            return (0, len);
        }
        let width = columns - 2;

        let (lo, hi) = self.focus(width);
        let center = lo + (hi - lo) / 2;
        let start = center.saturating_sub(width / 2).min(len - width);
        let end = start + width;

        // Reclaim the column of an ellipsis that is not needed.
        if start == 0 {
            (0, columns - 1)
        } else if end == len {
            (len - (columns - 1), len)
        } else {
            (start, end)
        }
    }

    /// Range the window must show: all highlights if they fit,
    /// otherwise the first primary one.
    fn focus(&self, width: usize) -> (usize, usize) {
        let len = self.input.len();
        let clip = |start: usize, end: usize| (start.min(len), end.min(len).max(start.min(len)));

        let lo = self.highlights.iter().map(|g| g.start).min().unwrap_or(0);
        let hi = self
            .highlights
            .iter()
            .map(HighlightGroup::display_end)
            .max()
            .unwrap_or(0);
        let (lo, hi) = clip(lo, hi);
        if hi - lo <= width {
            return (lo, hi);
        }

        let anchor = self
            .highlights
            .iter()
            .find(|g| g.primary)
            .or_else(|| self.highlights.first());
        let (lo, hi) = anchor.map_or((0, 0), |g| clip(g.start, g.display_end()));
        (lo, hi.min(lo + width))
    }

    fn render(&self, from: usize, to: usize, layout: Layout) -> String {
        let len = self.input.len();
        let left = from > 0;
        let right = to < len;

        let mut line = String::new();
        if left {
            line.push(ELLIPSIS);
        }
        line.extend(self.input[from..to].iter().map(|&c| {
            if layout == Layout::Flattened && c.is_whitespace() {
                ' '
            } else {
                c
            }
        }));
        if right {
            line.push(ELLIPSIS);
        }

        let offset = usize::from(left);
        // Markers may sit one column past the end of the input.
        let visible_end = if right { to } else { to + 1 };
        let mut marks = vec![' '; offset + visible_end - from];
        if layout == Layout::Verbatim {
            for (column, &c) in self.input[from..to].iter().enumerate() {
                if c == '\t' {
                    marks[offset + column] = '\t';
                }
            }
        }

        for primary in [false, true] {
            for group in self.highlights.iter().filter(|g| g.primary == primary) {
                let start = group.start.max(from);
                let end = group.display_end().min(visible_end);
                let mark = if primary {
                    PRIMARY_MARK
                } else {
                    SECONDARY_MARK
                };
                for column in start..end {
                    marks[offset + column - from] = mark;
                }
            }
        }

        let marks: String = marks.into_iter().collect();
        format!("{}\n{line}\n{}", self.message, marks.trim_end())
    }
}

/// How [`EvaluationError::render`] shows the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Original characters, newlines included.
    Verbatim,
    /// Every whitespace character shown as a space.
    Flattened,
}

fn first_column(highlights: &[HighlightGroup]) -> usize {
    highlights
        .iter()
        .find(|g| g.primary)
        .or_else(|| highlights.first())
        .map_or(1, |g| g.start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Arc<[char]> {
        text.chars().collect()
    }

    #[test]
    fn display_reports_primary_column() {
        let err = EvaluationError::new(
            chars("1 + x"),
            vec![HighlightGroup::primary(4, 5)],
            "unknown identifier 'x'",
        );
        assert_eq!(err.to_string(), "unknown identifier 'x' at column 5");
    }

    #[test]
    fn full_marks_primary_and_secondary() {
        let err = EvaluationError::new(
            chars("1 / 0"),
            vec![
                HighlightGroup::primary(2, 3),
                HighlightGroup::secondary(0, 1),
                HighlightGroup::secondary(4, 5),
            ],
            "division by zero",
        );
        assert_eq!(err.full(), "division by zero\n1 / 0\n~ ^ ~");
    }

    #[test]
    fn primary_wins_on_overlap() {
        let err = EvaluationError::new(
            chars("abcdef"),
            vec![
                HighlightGroup::secondary(0, 6),
                HighlightGroup::primary(2, 4),
            ],
            "overlap",
        );
        assert_eq!(err.full(), "overlap\nabcdef\n~~^^~~");
    }

    #[test]
    fn empty_group_at_end_takes_one_column() {
        let err = EvaluationError::new(chars("1 +"), vec![HighlightGroup::primary(3, 3)], "end");
        assert_eq!(err.full(), "end\n1 +\n   ^");
    }

    #[test]
    fn short_input_pretty_equals_full() {
        let err = EvaluationError::new(chars("2 ** x"), vec![HighlightGroup::primary(5, 6)], "bad");
        assert_eq!(err.pretty(), err.full());
    }

    #[test]
    fn pretty_windows_long_input() {
        let input = format!("{}1/0{}", "1+".repeat(100), "+1".repeat(100));
        let err = EvaluationError::new(
            chars(&input),
            vec![HighlightGroup::primary(201, 202)],
            "division by zero",
        );
        let pretty = err.pretty();
        let mut lines = pretty.lines();
        assert_eq!(lines.next(), Some("division by zero"));
        let line = lines.next().expect("source line");
        let marks = lines.next().expect("marker line");
        assert_eq!(line.chars().count(), PRETTY_COLUMNS);
        assert!(line.starts_with(ELLIPSIS) && line.ends_with(ELLIPSIS));
        let caret = marks.chars().position(|c| c == '^').expect("caret");
        assert_eq!(line.chars().nth(caret), Some('/'));
    }

    #[test]
    fn pretty_keeps_start_without_left_ellipsis() {
        let input = format!("@{}", "1".repeat(200));
        let err = EvaluationError::new(chars(&input), vec![HighlightGroup::primary(0, 1)], "x");
        let pretty = err.pretty_within(10);
        let line = pretty.lines().nth(1).expect("source line");
        assert_eq!(line, "@11111111…");
        assert_eq!(pretty.lines().nth(2), Some("^"));
    }

    #[test]
    fn pretty_keeps_end_without_right_ellipsis() {
        let input = format!("{}+", "1".repeat(200));
        let err = EvaluationError::new(chars(&input), vec![HighlightGroup::primary(201, 201)], "x");
        let pretty = err.pretty_within(10);
        let line = pretty.lines().nth(1).expect("source line");
        assert_eq!(line, "…11111111+");
        assert_eq!(pretty.lines().nth(2), Some("          ^"));
    }

    #[test]
    fn pretty_renders_newlines_as_spaces() {
        let err = EvaluationError::new(chars("1\n+"), vec![HighlightGroup::primary(2, 3)], "x");
        assert_eq!(err.pretty(), "x\n1 +\n  ^");
    }

    #[test]
    fn full_keeps_original_whitespace() {
        let err = EvaluationError::new(chars("1\n+"), vec![HighlightGroup::primary(2, 3)], "x");
        assert_eq!(err.full(), "x\n1\n+\n  ^");
    }

    #[test]
    fn full_mirrors_tabs_in_marker_line() {
        let err = EvaluationError::new(
            chars("1\t/\t0"),
            vec![
                HighlightGroup::secondary(0, 1),
                HighlightGroup::primary(2, 3),
                HighlightGroup::secondary(4, 5),
            ],
            "division by zero",
        );
        assert_eq!(err.full(), "division by zero\n1\t/\t0\n~\t^\t~");
        assert_eq!(err.pretty(), "division by zero\n1 / 0\n~ ^ ~");
    }

    #[test]
    fn tiny_budgets_never_slice_past_input() {
        let err = EvaluationError::new(chars("$"), vec![HighlightGroup::primary(0, 1)], "x");
        assert_eq!(err.pretty_within(0), "x\n$\n^");
        assert_eq!(err.pretty_within(1), "x\n$\n^");

        let err = EvaluationError::new(chars("ab"), vec![HighlightGroup::primary(1, 2)], "x");
        assert_eq!(err.pretty_within(0), "x\nab\n ^");
    }

    #[test]
    fn zero_budget_on_long_input_uses_three_columns() {
        let input = format!("{}$", "1".repeat(20));
        let err = EvaluationError::new(chars(&input), vec![HighlightGroup::primary(20, 21)], "x");
        let pretty = err.pretty_within(0);
        let line = pretty.lines().nth(1).expect("source line");
        assert_eq!(line, "…1$");
        assert_eq!(pretty.lines().nth(2), Some("  ^"));
    }
}
