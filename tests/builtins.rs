//! Built-in constants and functions.

mod common;

use common::{assert_float, eval_err, eval_ok, int, primary};
use sandcalc::builtins::{CONSTANTS, FUNCTIONS, constant, function};
use sandcalc::{Limits, Number, evaluate_with_limits};

// -----------------------------------------------------------
// Lookup tables.
// -----------------------------------------------------------

#[test]
fn lookup_is_case_insensitive() {
    assert_eq!(constant("PI"), Some(std::f64::consts::PI));
    assert_eq!(function("SQRT").map(|f| f.name), Some("sqrt"));
    assert_eq!(eval_ok("Pi"), eval_ok("pi"));
    assert_eq!(eval_ok("ABS(-3)"), int(3));
}

#[test]
fn table_names_are_unique() {
    let mut names: Vec<String> = CONSTANTS
        .iter()
        .map(|(name, _)| name.to_lowercase())
        .chain(FUNCTIONS.iter().map(|f| f.name.to_lowercase()))
        .collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn constants_evaluate_to_floats() {
    assert_float("pi", std::f64::consts::PI);
    assert_float("τ", std::f64::consts::TAU);
    assert_float("e", std::f64::consts::E);
    assert_float("phi * phi - phi", 1.0);
    assert_eq!(eval_ok("inf"), Number::from(f64::INFINITY));
    assert_eq!(eval_ok("-∞"), Number::from(f64::NEG_INFINITY));
    assert!(matches!(eval_ok("nan"), Number::Float(x) if x.is_nan()));
}

// -----------------------------------------------------------
// Functions.
// -----------------------------------------------------------

#[test]
fn sqrt_and_roots() {
    assert_eq!(eval_ok("sqrt(4)"), Number::from(2.0));
    assert_eq!(eval_ok("isqrt(17)"), int(4));
    assert_float("cbrt(-27)", -3.0);
}

#[test]
fn factorial_values() {
    assert_eq!(eval_ok("factorial(0)"), int(1));
    assert_eq!(eval_ok("factorial(5)"), int(120));
    assert_eq!(eval_ok("factorial(5.0)"), int(120));
    assert_eq!(
        eval_ok("factorial(25)").to_string(),
        "15511210043330985984000000"
    );
}

#[test]
fn rounding_functions_return_integers() {
    assert_eq!(eval_ok("floor(-2.5)"), int(-3));
    assert_eq!(eval_ok("ceil(-2.5)"), int(-2));
    assert_eq!(eval_ok("trunc(-2.5)"), int(-2));
    assert_eq!(eval_ok("round(2.5)"), int(2));
    assert_eq!(eval_ok("round(3.5)"), int(4));
    assert_eq!(eval_ok("floor(7)"), int(7));
}

#[test]
fn transcendental_functions() {
    assert_float("exp(0)", 1.0);
    assert_float("ln(e)", 1.0);
    assert_float("log(e ** 2)", 2.0);
    assert_float("log2(1024)", 10.0);
    assert_float("log10(1k)", 3.0);
    assert_float("sin(pi / 2)", 1.0);
    assert_float("cos(0)", 1.0);
    assert_float("tan(pi / 4)", 1.0);
    assert_float("asin(1)", std::f64::consts::FRAC_PI_2);
    assert_float("acos(1)", 0.0);
    assert_float("atan(1)", std::f64::consts::FRAC_PI_4);
    assert_float("sinh(0)", 0.0);
    assert_float("cosh(0)", 1.0);
    assert_float("tanh(0)", 0.0);
    assert_float("degrees(pi)", 180.0);
    assert_float("radians(180)", std::f64::consts::PI);
}

#[test]
fn abs_keeps_number_kind() {
    assert_eq!(eval_ok("abs(-5)"), int(5));
    assert_eq!(eval_ok("abs(-2.5)"), Number::from(2.5));
}

#[test]
fn nested_calls() {
    assert_eq!(eval_ok("sqrt(abs(-16))"), Number::from(4.0));
    assert_eq!(eval_ok("factorial(isqrt(26)) + 1"), int(121));
}

// -----------------------------------------------------------
// Domain checks.
// -----------------------------------------------------------

#[test]
fn sqrt_of_negative() {
    let err = eval_err("sqrt(-1)");
    assert_eq!(err.message(), "cannot take the square root of negative value -1");
    assert_eq!(err.highlights(), &[primary(5, 7)]);
}

#[test]
fn factorial_domain_errors_are_distinct() {
    let negative = eval_err("factorial(-1)");
    let fractional = eval_err("factorial(0.5)");
    assert_eq!(
        negative.message(),
        "factorial is not defined for negative values, got -1"
    );
    assert_eq!(
        fractional.message(),
        "factorial is only defined for integral values, got 0.5"
    );
    assert_ne!(negative.message(), fractional.message());
}

#[test]
fn factorial_limit() {
    assert!(eval_ok("factorial(1000)").is_integer());
    let err = eval_err("factorial(1001)");
    assert_eq!(
        err.message(),
        "factorial argument 1001 exceeds the limit of 1000"
    );
    let limits = Limits {
        max_factorial: 10,
        ..Limits::DEFAULT
    };
    assert!(evaluate_with_limits("factorial(11)", &limits).is_err());
}

#[test]
fn checker_highlights_whole_argument() {
    let err = eval_err("2 + factorial(3 - 4)");
    assert_eq!(err.highlights(), &[primary(14, 19)]);
}

#[test]
fn isqrt_requires_integer() {
    let err = eval_err("isqrt(2.0)");
    assert_eq!(err.message(), "isqrt requires an integer argument, got 2.0");
}

#[test]
fn logarithm_domain() {
    let err = eval_err("ln(0)");
    assert_eq!(
        err.message(),
        "logarithm is only defined for positive values, got 0"
    );
    assert!(eval_err("log10(-5)").message().starts_with("logarithm"));
}

#[test]
fn inverse_trig_domain() {
    let err = eval_err("asin(2)");
    assert_eq!(err.message(), "argument must lie within [-1, 1], got 2");
}

#[test]
fn rounding_rejects_non_finite() {
    assert_eq!(eval_err("floor(nan)").message(), "cannot convert nan to an integer");
    assert_eq!(
        eval_err("round(-inf)").message(),
        "cannot convert infinite value -inf to an integer"
    );
}

#[test]
fn failing_implementation_is_wrapped() {
    let err = eval_err("exp(1000)");
    assert_eq!(
        err.message(),
        "exp(1000) failed: result is too large to represent"
    );
    let err = eval_err("sqrt(1 << 2000)");
    assert!(
        err.message()
            .ends_with("failed: integer is too large to convert to float"),
        "{}",
        err.message()
    );
    assert_eq!(common::primaries(&err), vec![(0, 4)]);
}
