#![allow(dead_code)]

use sandcalc::{EvaluationError, HighlightGroup, Number, evaluate};

/// Evaluate `input`, panicking with the diagnostic on failure.
pub fn eval_ok(input: &str) -> Number {
    evaluate(input).unwrap_or_else(|e| panic!("{input:?} failed:\n{}", e.full()))
}

/// Evaluate `input`, panicking if it unexpectedly succeeds.
pub fn eval_err(input: &str) -> EvaluationError {
    match evaluate(input) {
        Ok(value) => panic!("{input:?} evaluated to {value}, expected an error"),
        Err(e) => e,
    }
}

pub fn int(value: i64) -> Number {
    Number::from(value)
}

/// Assert a float result within a small tolerance.
pub fn assert_float(input: &str, expected: f64) {
    match eval_ok(input) {
        Number::Float(x) => assert!(
            (x - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{input:?} = {x}, expected {expected}"
        ),
        other => panic!("{input:?} = {other:?}, expected a float"),
    }
}

/// Spans of the primary highlight groups.
pub fn primaries(err: &EvaluationError) -> Vec<(usize, usize)> {
    err.highlights()
        .iter()
        .filter(|g| g.primary)
        .map(|g| (g.start, g.end))
        .collect()
}

pub fn primary(start: usize, end: usize) -> HighlightGroup {
    HighlightGroup::primary(start, end)
}

pub fn secondary(start: usize, end: usize) -> HighlightGroup {
    HighlightGroup::secondary(start, end)
}
