//! CLI tool to evaluate arithmetic expressions in a sandbox.

use std::io::{self, BufRead};
use std::process::ExitCode;

use sandcalc::EvaluationError;

fn report(error: &EvaluationError, full: bool) {
    if full {
        eprintln!("{}", error.full());
    } else {
        eprintln!("{}", error.pretty());
    }
}

/// Evaluate one expression, printing the result or the diagnostic.
fn run(expression: &str, full: bool) -> bool {
    match sandcalc::evaluate(expression) {
        Ok(value) => {
            println!("{value}");
            true
        }
        Err(e) => {
            report(&e, full);
            false
        }
    }
}

/// What the command line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Evaluate { full: bool, expressions: Vec<String> },
}

/// Split arguments into options and expressions.
///
/// Before a `--` separator, an argument is an option only when `--`
/// is followed by a letter, so `--5` is still an expression.
fn parse_args(args: Vec<String>) -> Result<Command, String> {
    let mut full = false;
    let mut expressions = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--" => expressions.extend(args.by_ref()),
            "--help" | "-h" => return Ok(Command::Help),
            "--full" => full = true,
            _ if is_option(&arg) => return Err(format!("Unknown option: {arg}")),
            _ => expressions.push(arg),
        }
    }
    Ok(Command::Evaluate { full, expressions })
}

fn is_option(arg: &str) -> bool {
    arg.strip_prefix("--")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_alphabetic())
}

fn main() -> ExitCode {
    env_logger::init();

    let (full, args) = match parse_args(std::env::args().skip(1).collect()) {
        Ok(Command::Evaluate { full, expressions }) => (full, expressions),
        Ok(Command::Help) => {
            eprintln!("Usage: sandcalc [--full] [--] [expression...]");
            eprintln!();
            eprintln!("Evaluates each argument as an expression. With no");
            eprintln!("expressions, reads one expression per line from stdin.");
            eprintln!();
            eprintln!("Options:");
            eprintln!("  --full    Show the whole input in diagnostics");
            eprintln!("  --        Treat every later argument as an expression");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  sandcalc '2 ** 10 - 1'");
            eprintln!("  sandcalc 'factorial(20) // 3k'");
            eprintln!("  sandcalc -- --pi");
            eprintln!("  echo 'sqrt(2)' | sandcalc");
            return ExitCode::from(2);
        }
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let mut had_error = false;

    if args.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("stdin: {e}");
                    return ExitCode::from(2);
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            had_error |= !run(&line, full);
        }
    } else {
        for expression in &args {
            had_error |= !run(expression, full);
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
