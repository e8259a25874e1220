//! End-to-end tests through the public `evaluate` entry point.

mod common;

use common::{assert_float, eval_err, eval_ok, int, primaries};
use sandcalc::{Number, evaluate};

// -----------------------------------------------------------
// Documented behaviour.
// -----------------------------------------------------------

#[test]
fn decimal_literal_identity() {
    assert_eq!(eval_ok("42"), int(42));
    assert_eq!(eval_ok("0"), int(0));
    assert_eq!(eval_ok("007"), int(7));
}

#[test]
fn postfix_letters() {
    assert_eq!(eval_ok("2k"), int(2000));
    assert_eq!(eval_ok("3M"), int(3_000_000));
    assert_eq!(eval_ok("1.5 * 2k"), Number::from(3000.0));
}

#[test]
fn precedence_examples() {
    assert_eq!(eval_ok("2+3*4"), int(14));
    assert_eq!(eval_ok("(2+3)*4"), int(20));
    assert_eq!(eval_ok("2**2**3"), int(64));
    assert_eq!(eval_ok("-2**2"), int(-4));
}

#[test]
fn division_by_zero_mentions_operands_and_operator() {
    for (input, symbol) in [("1/0", "/"), ("1//0", "//"), ("1%0", "%")] {
        let message = eval_err(input).message().to_owned();
        assert!(message.contains('1'), "{message}");
        assert!(message.contains('0'), "{message}");
        assert!(message.contains(symbol), "{message}");
    }
}

#[test]
fn unbalanced_parentheses_point_at_paren() {
    assert_eq!(primaries(&eval_err("(1+2")), vec![(0, 1)]);
    assert_eq!(primaries(&eval_err("1+2)")), vec![(3, 4)]);
}

#[test]
fn function_calls() {
    assert_eq!(eval_ok("sqrt(4)"), Number::from(2.0));
    assert_eq!(eval_ok("factorial(5)"), int(120));
    assert!(eval_err("sqrt(-1)").message().contains("square root"));
    assert_ne!(
        eval_err("factorial(-1)").message(),
        eval_err("factorial(0.5)").message()
    );
}

#[test]
fn repeated_calls_are_identical() {
    for input in ["1/3", "2**0.5", "factorial(30) // 7", "sin(1) + cos(1)"] {
        let first = eval_ok(input);
        for _ in 0..3 {
            let again = eval_ok(input);
            match (&first, &again) {
                (Number::Float(a), Number::Float(b)) => assert_eq!(a.to_bits(), b.to_bits()),
                _ => assert_eq!(first, again),
            }
        }
    }
}

// -----------------------------------------------------------
// Realistic inputs.
// -----------------------------------------------------------

#[test]
fn realistic_expressions() {
    assert_eq!(eval_ok("  (1 + 2) * (3 + 4)  "), int(21));
    assert_eq!(eval_ok("0xFF_FF & ~0xF0"), int(0xFF0F));
    assert_eq!(eval_ok("1 << 8 | 1 << 4 | 1"), int(273));
    assert_eq!(eval_ok("3M // 7k % 100"), int(28));
    assert_eq!(eval_ok("abs(-2) ** 10 - 1"), int(1023));
    assert_eq!(eval_ok("floor(2.5e3 / 7)"), int(357));
    assert_float("sqrt(3**2 + 4**2)", 5.0);
    assert_float("2 * pi * 6371", 40_030.173_592_041_145);
    assert_float("1e-3 * 1k", 1.0);
}

#[test]
fn display_of_results() {
    assert_eq!(eval_ok("4/2").to_string(), "2.0");
    assert_eq!(eval_ok("1/4").to_string(), "0.25");
    assert_eq!(eval_ok("2.0 ** 60").to_string(), "1.152921504606847e18");
    assert_eq!(eval_ok("1 / 0.5e5").to_string(), "2e-5");
    assert_eq!(eval_ok("-inf").to_string(), "-inf");
    assert_eq!(eval_ok("2 ** 70").to_string(), "1180591620717411303424");
}

#[test]
fn newline_and_tab_whitespace() {
    assert_eq!(eval_ok("1 +\n\t2"), int(3));
}

#[test]
fn malicious_inputs_fail_fast() {
    let inputs = [
        "(1 << 9000) ** 3",
        "2 ** 5000 ** 2",
        "factorial(factorial(10))",
        "1 << 100000",
        "(1 << 10000) * (1 << 10000)",
        "10 ** 100000",
    ];
    for input in inputs {
        assert!(evaluate(input).is_err(), "{input} should be rejected");
    }
}

#[test]
fn concurrent_evaluations_share_tables() {
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|n| scope.spawn(move || evaluate(&format!("factorial({n}) * 1.0"))))
            .collect();
        let expected = [1.0, 1.0, 2.0, 6.0, 24.0, 120.0, 720.0, 5040.0];
        for (handle, want) in handles.into_iter().zip(expected) {
            let value = handle.join().expect("thread").expect("evaluate");
            assert_eq!(value, Number::from(want));
        }
    });
}
