//! Structural builder: turns the validated flat token list into a
//! token tree.
//!
//! Runs in three passes. `+`, `-`, and `~` in prefix position become
//! prefix operators. Chains of prefixes are merged algebraically, and
//! no-op `+` prefixes are dropped. Finally, parenthesized spans
//! collapse into [`TokenKind::Group`] or [`TokenKind::Call`] tokens
//! whose `children` hold the inner tokens.

use crate::error::EvaluationError;
use crate::limits::Limits;
use crate::token::{Token, TokenKind};

/// Build the token tree from validated tokens.
///
/// # Errors
///
/// Returns `EvaluationError` when parentheses nest deeper than
/// `limits.max_nesting_depth`, or on unbalanced parentheses that
/// bypassed validation.
pub fn build(tokens: Vec<Token>, limits: &Limits) -> Result<Vec<Token>, EvaluationError> {
    let tokens = merge_prefixes(classify_prefixes(tokens));
    let tree = group(tokens, limits)?;
    log::debug!("built tree with {} top-level tokens", tree.len());
    Ok(tree)
}

/// Reclassify `+`, `-`, `~` that begin an operand as prefixes.
fn classify_prefixes(mut tokens: Vec<Token>) -> Vec<Token> {
    for i in 0..tokens.len() {
        let Some(prefix) = tokens[i].kind.as_prefix() else {
            continue;
        };
        let after_operand = i > 0
            && (tokens[i - 1].kind.is_operand() || tokens[i - 1].kind == TokenKind::CloseParen);
        let before_operand = tokens
            .get(i + 1)
            .is_some_and(|next| next.kind.starts_operand());
        if !after_operand && before_operand {
            tokens[i].kind = prefix;
        }
    }
    tokens
}

/// Net effect of prefix `outer` applied over prefix `inner`.
const fn combine(outer: TokenKind, inner: TokenKind) -> Option<TokenKind> {
    match (outer, inner) {
        (TokenKind::Negate, TokenKind::Negate) | (TokenKind::Invert, TokenKind::Invert) => {
            Some(TokenKind::Positivate)
        }
        (TokenKind::Positivate, other) | (other, TokenKind::Positivate) => Some(other),
        _ => None,
    }
}

/// Merge adjacent prefixes right to left and drop no-op `+`.
fn merge_prefixes(tokens: Vec<Token>) -> Vec<Token> {
    // Built back to front: the last element is the token to the right.
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens.into_iter().rev() {
        let combined = merged
            .last()
            .filter(|inner| token.kind.is_prefix() && inner.kind.is_prefix())
            .and_then(|inner| combine(token.kind, inner.kind));
        match (combined, merged.pop()) {
            (Some(kind), Some(inner)) => {
                merged.push(Token::new(&token.source, token.start, inner.end, kind));
            }
            (_, inner) => {
                merged.extend(inner);
                merged.push(token);
            }
        }
    }
    merged.retain(|token| token.kind != TokenKind::Positivate);
    merged.reverse();
    merged
}

/// One level of parenthesis nesting under construction.
struct Frame {
    open: Option<Token>,
    callee: Option<Token>,
    tokens: Vec<Token>,
}

impl Frame {
    const fn root() -> Self {
        Self {
            open: None,
            callee: None,
            tokens: Vec::new(),
        }
    }

    /// Collapse the frame into one token at its closing parenthesis.
    fn close(mut self, close: &Token) -> Result<Token, EvaluationError> {
        let Some(open) = self.open else {
            return Err(EvaluationError::at(
                close,
                "unbalanced parentheses: ')' was never opened",
            ));
        };
        if self.tokens.is_empty() {
            return Err(EvaluationError::at_pair(&open, close, "empty parentheses"));
        }

        if let Some(callee) = self.callee {
            let Some(function) = callee.function() else {
                return Err(EvaluationError::at(&callee, "not a function"));
            };
            return Ok(Token::call(
                &callee.source,
                callee.start,
                close.end,
                function,
                self.tokens,
            ));
        }

        if self.tokens.len() == 1 {
            return Ok(self.tokens.swap_remove(0));
        }
        Ok(Token::group(&open.source, open.start, close.end, self.tokens))
    }
}

/// Collapse every parenthesis pair into a single token, bottom-up.
fn group(tokens: Vec<Token>, limits: &Limits) -> Result<Vec<Token>, EvaluationError> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut current = Frame::root();

    for token in tokens {
        match token.kind {
            TokenKind::OpenParen => {
                if stack.len() >= limits.max_nesting_depth {
                    return Err(EvaluationError::at(
                        &token,
                        format!(
                            "parentheses nested deeper than {} levels",
                            limits.max_nesting_depth
                        ),
                    ));
                }
                let callee = if current
                    .tokens
                    .last()
                    .is_some_and(|last| last.kind == TokenKind::Function)
                {
                    current.tokens.pop()
                } else {
                    None
                };
                let frame = Frame {
                    open: Some(token),
                    callee,
                    tokens: Vec::new(),
                };
                stack.push(std::mem::replace(&mut current, frame));
            }
            TokenKind::CloseParen => {
                let Some(parent) = stack.pop() else {
                    return Err(EvaluationError::at(
                        &token,
                        "unbalanced parentheses: ')' was never opened",
                    ));
                };
                let closed = std::mem::replace(&mut current, parent).close(&token)?;
                current.tokens.push(closed);
            }
            _ => current.tokens.push(token),
        }
    }

    if let Some(open) = current.open {
        return Err(EvaluationError::at(
            &open,
            "unbalanced parentheses: '(' was never closed",
        ));
    }
    Ok(current.tokens)
}
