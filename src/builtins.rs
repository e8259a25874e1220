//! Read-only tables of named constants and functions.
//!
//! Both tables are plain `static` slices, so concurrent evaluations
//! share them without synchronization. Names match ASCII
//! case-insensitively.

use std::f64::consts;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive};

use crate::error::EvaluationError;
use crate::limits::Limits;
use crate::number::Number;
use crate::token::Token;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Underlying computation of a built-in function.
pub type Apply = fn(&Number) -> Result<Number, FunctionError>;

/// Domain check run on the argument before [`Apply`].
///
/// Receives the argument token for highlighting, its value, and the
/// active limits.
pub type Check = fn(&Token, &Number, &Limits) -> Result<(), EvaluationError>;

/// A named built-in function of one argument.
#[derive(Debug)]
pub struct Function {
    pub name: &'static str,
    pub apply: Apply,
    pub check: Option<Check>,
}

/// Failure inside a function implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FunctionError {
    #[error("result is too large to represent")]
    Overflow,
    #[error("integer is too large to convert to float")]
    IntTooLarge,
    #[error("math domain error")]
    Domain,
}

pub static CONSTANTS: &[(&str, f64)] = &[
    ("pi", consts::PI),
    ("π", consts::PI),
    ("tau", consts::TAU),
    ("τ", consts::TAU),
    ("e", consts::E),
    ("phi", GOLDEN_RATIO),
    ("φ", GOLDEN_RATIO),
    ("inf", f64::INFINITY),
    ("∞", f64::INFINITY),
    ("nan", f64::NAN),
];

pub static FUNCTIONS: &[Function] = &[
    Function {
        name: "sqrt",
        apply: sqrt,
        check: Some(check_sqrt),
    },
    Function {
        name: "isqrt",
        apply: isqrt,
        check: Some(check_isqrt),
    },
    Function {
        name: "cbrt",
        apply: cbrt,
        check: None,
    },
    Function {
        name: "abs",
        apply: abs,
        check: None,
    },
    Function {
        name: "factorial",
        apply: factorial,
        check: Some(check_factorial),
    },
    Function {
        name: "floor",
        apply: floor,
        check: Some(check_roundable),
    },
    Function {
        name: "ceil",
        apply: ceil,
        check: Some(check_roundable),
    },
    Function {
        name: "round",
        apply: round,
        check: Some(check_roundable),
    },
    Function {
        name: "trunc",
        apply: trunc,
        check: Some(check_roundable),
    },
    Function {
        name: "exp",
        apply: exp,
        check: None,
    },
    Function {
        name: "ln",
        apply: ln,
        check: Some(check_logarithm),
    },
    Function {
        name: "log",
        apply: ln,
        check: Some(check_logarithm),
    },
    Function {
        name: "log2",
        apply: log2,
        check: Some(check_logarithm),
    },
    Function {
        name: "log10",
        apply: log10,
        check: Some(check_logarithm),
    },
    Function {
        name: "sin",
        apply: sin,
        check: None,
    },
    Function {
        name: "cos",
        apply: cos,
        check: None,
    },
    Function {
        name: "tan",
        apply: tan,
        check: None,
    },
    Function {
        name: "asin",
        apply: asin,
        check: Some(check_unit_interval),
    },
    Function {
        name: "acos",
        apply: acos,
        check: Some(check_unit_interval),
    },
    Function {
        name: "atan",
        apply: atan,
        check: None,
    },
    Function {
        name: "sinh",
        apply: sinh,
        check: None,
    },
    Function {
        name: "cosh",
        apply: cosh,
        check: None,
    },
    Function {
        name: "tanh",
        apply: tanh,
        check: None,
    },
    Function {
        name: "degrees",
        apply: degrees,
        check: None,
    },
    Function {
        name: "radians",
        apply: radians,
        check: None,
    },
];

/// Look up a named constant.
#[must_use]
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|&(_, value)| value)
}

/// Look up a named function.
#[must_use]
pub fn function(name: &str) -> Option<&'static Function> {
    FUNCTIONS
        .iter()
        .find(|function| function.name.eq_ignore_ascii_case(name))
}

// -----------------------------------------------------------
// Domain checks.
// -----------------------------------------------------------

fn check_sqrt(argument: &Token, value: &Number, _: &Limits) -> Result<(), EvaluationError> {
    if value.is_negative() {
        return Err(EvaluationError::at(
            argument,
            format!("cannot take the square root of negative value {}", value.brief()),
        ));
    }
    Ok(())
}

fn check_isqrt(argument: &Token, value: &Number, limits: &Limits) -> Result<(), EvaluationError> {
    if !value.is_integer() {
        return Err(EvaluationError::at(
            argument,
            format!("isqrt requires an integer argument, got {}", value.brief()),
        ));
    }
    check_sqrt(argument, value, limits)
}

fn check_factorial(
    argument: &Token,
    value: &Number,
    limits: &Limits,
) -> Result<(), EvaluationError> {
    let Some(n) = integral(value) else {
        return Err(EvaluationError::at(
            argument,
            format!("factorial is only defined for integral values, got {}", value.brief()),
        ));
    };
    if n.is_negative() {
        return Err(EvaluationError::at(
            argument,
            format!("factorial is not defined for negative values, got {n}"),
        ));
    }
    if n > BigInt::from(limits.max_factorial) {
        return Err(EvaluationError::at(
            argument,
            format!(
                "factorial argument {} exceeds the limit of {}",
                value.brief(),
                limits.max_factorial
            ),
        ));
    }
    Ok(())
}

fn check_roundable(argument: &Token, value: &Number, _: &Limits) -> Result<(), EvaluationError> {
    match value {
        Number::Float(x) if x.is_nan() => Err(EvaluationError::at(
            argument,
            "cannot convert nan to an integer",
        )),
        Number::Float(x) if x.is_infinite() => Err(EvaluationError::at(
            argument,
            format!("cannot convert infinite value {} to an integer", value.brief()),
        )),
        _ => Ok(()),
    }
}

fn check_logarithm(argument: &Token, value: &Number, _: &Limits) -> Result<(), EvaluationError> {
    if value.is_negative() || value.is_zero() {
        return Err(EvaluationError::at(
            argument,
            format!(
                "logarithm is only defined for positive values, got {}",
                value.brief()
            ),
        ));
    }
    Ok(())
}

fn check_unit_interval(
    argument: &Token,
    value: &Number,
    _: &Limits,
) -> Result<(), EvaluationError> {
    let inside = value.as_f64().is_some_and(|x| (-1.0..=1.0).contains(&x));
    if !inside {
        return Err(EvaluationError::at(
            argument,
            format!("argument must lie within [-1, 1], got {}", value.brief()),
        ));
    }
    Ok(())
}

// -----------------------------------------------------------
// Implementations.
// -----------------------------------------------------------

/// Exact integer value of an integer or integral float.
fn integral(value: &Number) -> Option<BigInt> {
    match value {
        Number::Int(n) => Some(n.clone()),
        Number::Float(x) if x.is_finite() && x.fract() == 0.0 => BigInt::from_f64(*x),
        Number::Float(_) => None,
    }
}

fn float(value: &Number) -> Result<f64, FunctionError> {
    value.as_f64().ok_or(FunctionError::IntTooLarge)
}

/// Apply `op` to the argument as a float.
///
/// A finite argument must not produce an infinite or NaN result.
fn real(value: &Number, op: fn(f64) -> f64) -> Result<Number, FunctionError> {
    let x = float(value)?;
    let result = op(x);
    if x.is_finite() && result.is_infinite() {
        return Err(FunctionError::Overflow);
    }
    if !x.is_nan() && result.is_nan() {
        return Err(FunctionError::Domain);
    }
    Ok(Number::Float(result))
}

/// Apply a float-to-integer rounding; integers pass through.
fn rounding(value: &Number, op: fn(f64) -> f64) -> Result<Number, FunctionError> {
    match value {
        Number::Int(n) => Ok(Number::Int(n.clone())),
        Number::Float(x) => BigInt::from_f64(op(*x))
            .map(Number::Int)
            .ok_or(FunctionError::Domain),
    }
}

fn sqrt(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::sqrt)
}

fn isqrt(value: &Number) -> Result<Number, FunctionError> {
    match value {
        Number::Int(n) if !n.is_negative() => Ok(Number::Int(n.sqrt())),
        _ => Err(FunctionError::Domain),
    }
}

fn cbrt(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::cbrt)
}

#[allow(clippy::unnecessary_wraps)]
fn abs(value: &Number) -> Result<Number, FunctionError> {
    Ok(match value {
        Number::Int(n) => Number::Int(n.abs()),
        Number::Float(x) => Number::Float(x.abs()),
    })
}

fn factorial(value: &Number) -> Result<Number, FunctionError> {
    let n = integral(value)
        .and_then(|n| n.to_u64())
        .ok_or(FunctionError::Domain)?;
    let product = (2..=n).fold(BigInt::one(), |acc, k| acc * k);
    Ok(Number::Int(product))
}

fn floor(value: &Number) -> Result<Number, FunctionError> {
    rounding(value, f64::floor)
}

fn ceil(value: &Number) -> Result<Number, FunctionError> {
    rounding(value, f64::ceil)
}

fn round(value: &Number) -> Result<Number, FunctionError> {
    rounding(value, f64::round_ties_even)
}

fn trunc(value: &Number) -> Result<Number, FunctionError> {
    rounding(value, f64::trunc)
}

fn exp(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::exp)
}

fn ln(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::ln)
}

fn log2(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::log2)
}

fn log10(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::log10)
}

fn sin(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::sin)
}

fn cos(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::cos)
}

fn tan(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::tan)
}

fn asin(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::asin)
}

fn acos(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::acos)
}

fn atan(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::atan)
}

fn sinh(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::sinh)
}

fn cosh(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::cosh)
}

fn tanh(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::tanh)
}

fn degrees(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::to_degrees)
}

fn radians(value: &Number) -> Result<Number, FunctionError> {
    real(value, f64::to_radians)
}
