//! Demonstrate diagnostics for invalid or unsafe input.

fn main() {
    // Unbalanced parenthesis
    match sandcalc::evaluate("(1 + 2") {
        Ok(value) => println!("Evaluated to {value} (unexpected)"),
        Err(e) => {
            println!("Error: {e}");
            println!("  Message: {}", e.message());
            println!("  Highlights: {:?}", e.highlights());
            println!("{}", e.full());
        }
    }

    println!();

    // Domain error inside a function
    match sandcalc::evaluate("factorial(-3)") {
        Ok(value) => println!("Evaluated to {value} (unexpected)"),
        Err(e) => println!("{}", e.pretty()),
    }

    println!();

    // A long input is windowed around the failure
    let long = format!("{}1 / (3 - 3) + {}2", "1 + ".repeat(30), "2 * ".repeat(30));
    match sandcalc::evaluate(&long) {
        Ok(value) => println!("Evaluated to {value} (unexpected)"),
        Err(e) => {
            println!("Pretty:\n{}", e.pretty());
            println!("Narrow:\n{}", e.pretty_within(24));
        }
    }
}
