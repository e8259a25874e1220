//! Grammar validation over the flat token list.
//!
//! Strips whitespace, checks parenthesis balance, and rejects illegal
//! token adjacencies before any structure is built.

use std::sync::Arc;

use crate::error::{EvaluationError, HighlightGroup};
use crate::token::{Token, TokenKind};

/// Adjacency role of a token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Literal or constant.
    Operand,
    /// Operator that is never a prefix.
    Infix,
    /// `+` or `-`, infix or prefix.
    Sign,
    /// `~`, prefix only.
    Tilde,
    Open,
    Close,
    Function,
}

const fn role(kind: TokenKind) -> Role {
    match kind {
        TokenKind::Plus | TokenKind::Minus | TokenKind::Negate | TokenKind::Positivate => {
            Role::Sign
        }
        TokenKind::Tilde | TokenKind::Invert => Role::Tilde,
        TokenKind::OpenParen => Role::Open,
        TokenKind::CloseParen => Role::Close,
        TokenKind::Function => Role::Function,
        kind if kind.is_infix() => Role::Infix,
        _ => Role::Operand,
    }
}

/// Whether `after` may not immediately follow `before`.
const fn forbids(before: Role, after: Role) -> bool {
    match (before, after) {
        (Role::Function, after) => !matches!(after, Role::Open),
        (Role::Operand | Role::Close, after) => {
            matches!(after, Role::Operand | Role::Open | Role::Function | Role::Tilde)
        }
        (Role::Infix | Role::Sign | Role::Tilde | Role::Open, after) => {
            matches!(after, Role::Infix | Role::Close)
        }
    }
}

/// Validate raw tokens and drop whitespace.
///
/// # Errors
///
/// Returns `EvaluationError` for an empty expression, unbalanced
/// parentheses, or an illegal adjacency, highlighting the tokens
/// involved.
pub fn validate(source: &Arc<[char]>, tokens: Vec<Token>) -> Result<Vec<Token>, EvaluationError> {
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|token| token.kind != TokenKind::Whitespace)
        .collect();

    if tokens.is_empty() {
        return Err(EvaluationError::new(
            Arc::clone(source),
            vec![HighlightGroup::primary(0, source.len())],
            "empty expression",
        ));
    }

    check_balance(&tokens)?;
    check_adjacency(&tokens)?;
    log::debug!("validated {} tokens", tokens.len());
    Ok(tokens)
}

fn check_balance(tokens: &[Token]) -> Result<(), EvaluationError> {
    let mut open: Vec<&Token> = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::OpenParen => open.push(token),
            TokenKind::CloseParen => {
                if open.pop().is_none() {
                    return Err(EvaluationError::at(
                        token,
                        "unbalanced parentheses: ')' was never opened",
                    ));
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(token) => Err(EvaluationError::at(
            token,
            "unbalanced parentheses: '(' was never closed",
        )),
        None => Ok(()),
    }
}

fn check_adjacency(tokens: &[Token]) -> Result<(), EvaluationError> {
    let leading = tokens
        .first()
        .filter(|first| matches!(role(first.kind), Role::Infix | Role::Close));
    if let Some(first) = leading {
        return Err(EvaluationError::at(
            first,
            format!("expression cannot start with '{}'", first.text()),
        ));
    }

    for pair in tokens.windows(2) {
        let [before, after] = pair else { continue };
        if !forbids(role(before.kind), role(after.kind)) {
            continue;
        }
        let message = if before.kind == TokenKind::Function {
            format!("function '{}' must be followed by '('", before.text())
        } else {
            format!("'{}' cannot follow '{}'", after.text(), before.text())
        };
        return Err(EvaluationError::at_pair(before, after, message));
    }

    if let Some(last) = tokens.last() {
        let message = match role(last.kind) {
            Role::Function => format!("function '{}' is missing its argument", last.text()),
            Role::Infix | Role::Sign | Role::Tilde | Role::Open => {
                format!("expression cannot end with '{}'", last.text())
            }
            Role::Operand | Role::Close => return Ok(()),
        };
        return Err(EvaluationError::new(
            Arc::clone(&last.source),
            vec![
                HighlightGroup::primary(last.start, last.end),
                HighlightGroup::secondary(last.end, last.end),
            ],
            message,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::limits::Limits;
    use crate::token::source;

    fn check(text: &str) -> Result<Vec<Token>, EvaluationError> {
        let source = source(text);
        let tokens = tokenize(&source, &Limits::DEFAULT).expect("should tokenize");
        validate(&source, tokens)
    }

    #[test]
    fn whitespace_is_stripped() {
        let tokens = check(" 1 +\t2 ").expect("should validate");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn adjacency_table() {
        assert!(forbids(Role::Operand, Role::Operand));
        assert!(forbids(Role::Close, Role::Open));
        assert!(forbids(Role::Function, Role::Operand));
        assert!(forbids(Role::Open, Role::Close));
        assert!(forbids(Role::Operand, Role::Tilde));
        assert!(!forbids(Role::Operand, Role::Sign));
        assert!(!forbids(Role::Sign, Role::Sign));
        assert!(!forbids(Role::Infix, Role::Tilde));
        assert!(!forbids(Role::Function, Role::Open));
    }

    #[test]
    fn two_literals_in_a_row() {
        let err = check("1 2").expect_err("should fail");
        assert_eq!(err.message(), "'2' cannot follow '1'");
        assert_eq!(
            err.highlights(),
            &[
                HighlightGroup::secondary(0, 1),
                HighlightGroup::primary(2, 3)
            ]
        );
    }

    #[test]
    fn empty_parentheses() {
        let err = check("()").expect_err("should fail");
        assert_eq!(err.message(), "')' cannot follow '('");
    }

    #[test]
    fn whitespace_only_is_empty() {
        let err = check("   ").expect_err("should fail");
        assert_eq!(err.message(), "empty expression");
    }
}
