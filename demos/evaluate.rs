//! Evaluate a handful of expressions and print their values.

fn main() {
    let expressions = [
        "2 + 3 * 4",
        "(2 + 3) * 4",
        "-2 ** 2",
        "2 ** -1",
        "7 // -2",
        "0xff ^ 0b1111",
        "1 << 100",
        "3k + 2M",
        "factorial(25)",
        "sqrt(2) * sqrt(2)",
        "round(2.5) + round(3.5)",
        "sin(pi / 2)",
    ];

    for expression in expressions {
        match sandcalc::evaluate(expression) {
            Ok(value) => println!("{expression} = {value}"),
            Err(e) => println!("{expression}: {e}"),
        }
    }

    // Tighter ceilings for an especially untrusted caller.
    let limits = sandcalc::Limits {
        max_int_bits: 64,
        max_power_bits: 64,
        ..sandcalc::Limits::DEFAULT
    };
    match sandcalc::evaluate_with_limits("(1 << 40) ** 2", &limits) {
        Ok(value) => println!("(1 << 40) ** 2 = {value}"),
        Err(e) => println!("(1 << 40) ** 2 under 64-bit limits:\n{}", e.full()),
    }
}
