//! Sandboxed arithmetic expression evaluator.
//!
//! Evaluates untrusted single-line arithmetic text to an exact integer
//! or a float. Every costly operation is bounded by [`Limits`], and
//! every failure is an [`EvaluationError`] that points at the offending
//! characters of the input.
//!
//! # Quick start
//!
//! ## Evaluate an expression
//!
//! ```
//! use sandcalc::{Number, evaluate};
//!
//! assert_eq!(evaluate("2 + 3 * 4").unwrap(), Number::from(14));
//! assert_eq!(evaluate("0xff & 0b1010").unwrap(), Number::from(10));
//! assert_eq!(evaluate("sqrt(16)").unwrap(), Number::from(4.0));
//! ```
//!
//! ## Render a diagnostic
//!
//! ```
//! let err = sandcalc::evaluate("1 + 2 / 0").unwrap_err();
//! assert_eq!(err.message(), "division by zero in '2 / 0'");
//! assert_eq!(err.full(), "division by zero in '2 / 0'\n1 + 2 / 0\n    ~ ^ ~");
//! ```
//!
//! ## Tighten the limits
//!
//! ```
//! use sandcalc::{Limits, evaluate_with_limits};
//!
//! let limits = Limits { max_shift: 8, ..Limits::DEFAULT };
//! assert!(evaluate_with_limits("1 << 64", &limits).is_err());
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod builtins;
pub mod error;
pub mod evaluator;
pub mod grammar;
pub mod lexer;
pub mod limits;
pub mod number;
pub mod parser;
pub mod scanner;
pub mod token;

pub use builtins::{Function, FunctionError};
pub use error::{EvaluationError, HighlightGroup, PRETTY_COLUMNS};
pub use limits::Limits;
pub use number::Number;
pub use token::{Payload, Token, TokenKind};

/// Evaluate `text` under [`Limits::DEFAULT`].
pub fn evaluate(text: &str) -> Result<Number, EvaluationError> {
    evaluate_with_limits(text, &Limits::DEFAULT)
}

/// Evaluate `text` under caller-supplied ceilings.
pub fn evaluate_with_limits(text: &str, limits: &Limits) -> Result<Number, EvaluationError> {
    let source = token::source(text);
    let tokens = lexer::tokenize(&source, limits)?;
    let tokens = grammar::validate(&source, tokens)?;
    let tree = parser::build(tokens, limits)?;
    let result = evaluator::evaluate(&source, tree, limits)?;
    log::debug!("evaluated {} characters to {}", source.len(), result.brief());
    Ok(result)
}
