//! Composable matchers the lexical grammar is built from.
//!
//! Every primitive implements [`Scanner`]: given a cursor, it either
//! consumes a prefix of the remaining input and returns `Ok(true)`,
//! or leaves the cursor where it was and returns `Ok(false)`. Only
//! [`followed_by`] can fail with a diagnostic.

use std::sync::Arc;

use crate::error::{EvaluationError, HighlightGroup};

/// Read position over the shared input.
#[derive(Debug)]
pub struct Cursor<'a> {
    source: &'a Arc<[char]>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub const fn new(source: &'a Arc<[char]>, pos: usize) -> Self {
        Self { source, pos }
    }

    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    const fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    fn bump_if(&mut self, accept: impl FnOnce(char) -> bool) -> bool {
        match self.peek() {
            Some(c) if accept(c) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }
}

/// A matcher over the input at a cursor.
pub trait Scanner: Send + Sync {
    /// Try to consume a prefix of the remaining input.
    ///
    /// On `Ok(false)` the cursor is unchanged.
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError>;
}

pub type Rule = Box<dyn Scanner>;

struct One(char);

impl Scanner for One {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        Ok(cursor.bump_if(|c| c == self.0))
    }
}

struct InRange(char, char);

impl Scanner for InRange {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        Ok(cursor.bump_if(|c| (self.0..=self.1).contains(&c)))
    }
}

struct AnyOf(&'static str);

impl Scanner for AnyOf {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        Ok(cursor.bump_if(|c| self.0.contains(c)))
    }
}

struct Exact(&'static str);

impl Scanner for Exact {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        let start = cursor.pos();
        for expected in self.0.chars() {
            if !cursor.bump_if(|c| c == expected) {
                cursor.rewind(start);
                return Ok(false);
            }
        }
        Ok(true)
    }
}

struct Optional(Rule);

impl Scanner for Optional {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        self.0.scan(cursor)?;
        Ok(true)
    }
}

struct Repeat(Rule);

impl Scanner for Repeat {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        loop {
            let before = cursor.pos();
            // Stop on an empty match so `repeat(optional(..))` terminates.
            if !self.0.scan(cursor)? || cursor.pos() == before {
                return Ok(true);
            }
        }
    }
}

struct Sequence(Vec<Rule>);

impl Scanner for Sequence {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        let start = cursor.pos();
        for rule in &self.0 {
            if !rule.scan(cursor)? {
                cursor.rewind(start);
                return Ok(false);
            }
        }
        Ok(true)
    }
}

struct FirstOf(Vec<Rule>);

impl Scanner for FirstOf {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        let start = cursor.pos();
        for rule in &self.0 {
            if rule.scan(cursor)? {
                return Ok(true);
            }
            cursor.rewind(start);
        }
        Ok(false)
    }
}

struct End;

impl Scanner for End {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        Ok(cursor.at_end())
    }
}

struct FollowedBy {
    rule: Rule,
    message: &'static str,
}

impl Scanner for FollowedBy {
    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<bool, EvaluationError> {
        let start = cursor.pos();
        let matched = self.rule.scan(cursor)?;
        cursor.rewind(start);
        if matched {
            return Ok(true);
        }
        Err(EvaluationError::new(
            Arc::clone(cursor.source),
            vec![HighlightGroup::primary(start, start + 1)],
            self.message,
        ))
    }
}

/// Match the single character `c`.
#[must_use]
pub fn one(c: char) -> Rule {
    Box::new(One(c))
}

/// Match one character in `low..=high`.
#[must_use]
pub fn range(low: char, high: char) -> Rule {
    Box::new(InRange(low, high))
}

/// Match one character from `set`.
#[must_use]
pub fn any_of(set: &'static str) -> Rule {
    Box::new(AnyOf(set))
}

/// Match `literal` exactly.
#[must_use]
pub fn exact(literal: &'static str) -> Rule {
    Box::new(Exact(literal))
}

/// Match `rule` if possible; always succeeds.
#[must_use]
pub fn optional(rule: Rule) -> Rule {
    Box::new(Optional(rule))
}

/// Match `rule` zero or more times; always succeeds.
#[must_use]
pub fn repeat(rule: Rule) -> Rule {
    Box::new(Repeat(rule))
}

/// Match every rule in order, or nothing.
#[must_use]
pub fn sequence(rules: Vec<Rule>) -> Rule {
    Box::new(Sequence(rules))
}

/// Match the first rule that succeeds.
#[must_use]
pub fn first_of(rules: Vec<Rule>) -> Rule {
    Box::new(FirstOf(rules))
}

/// Match only at the end of input, consuming nothing.
#[must_use]
pub fn end() -> Rule {
    Box::new(End)
}

/// Require `rule` to match next without consuming it.
///
/// Fails with `message` highlighting the next character when the
/// lookahead does not match.
#[must_use]
pub fn followed_by(rule: Rule, message: &'static str) -> Rule {
    Box::new(FollowedBy { rule, message })
}
