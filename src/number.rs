//! Numeric values produced by evaluation.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Floats at or beyond this magnitude display in exponent form.
const EXPONENT_ABOVE: f64 = 1e16;
/// Non-zero floats below this magnitude display in exponent form.
const EXPONENT_BELOW: f64 = 1e-4;
/// Integers with more digits than this are elided in messages.
const BRIEF_DIGITS: usize = 24;

/// Result of evaluating an expression: an exact integer or a float.
///
/// Integer and float values never compare equal to each other, so
/// `Number::from(2)` and `Number::from(2.0)` are distinct.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Arbitrary-size signed integer.
    Int(BigInt),
    /// IEEE 754 double.
    Float(f64),
}

impl Number {
    /// Whether this is an exact integer.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Whether the value is an exact zero (`0` or `0.0`).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(n) => n.is_zero(),
            Self::Float(f) => *f == 0.0,
        }
    }

    /// Whether the value is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Int(n) => n.is_negative(),
            Self::Float(f) => *f < 0.0,
        }
    }

    /// Convert to `f64`.
    ///
    /// Returns `None` when an integer is too large to be represented
    /// as a finite float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => n.to_f64().filter(|f| f.is_finite()),
            Self::Float(f) => Some(*f),
        }
    }

    /// Bit length of an integer's magnitude, `None` for floats.
    #[must_use]
    pub fn bits(&self) -> Option<u64> {
        match self {
            Self::Int(n) => Some(n.bits()),
            Self::Float(_) => None,
        }
    }

    /// Short rendering for diagnostic messages.
    ///
    /// Very long integers are elided to their leading and trailing
    /// digits plus a digit count.
    #[must_use]
    pub fn brief(&self) -> String {
        let full = self.to_string();
        let digits = full.trim_start_matches('-');
        if !self.is_integer() || digits.len() <= BRIEF_DIGITS {
            return full;
        }
        let sign = if full.starts_with('-') { "-" } else { "" };
        let half = BRIEF_DIGITS / 2;
        format!(
            "{sign}{}…{} ({} digits)",
            &digits[..half],
            &digits[digits.len() - half..],
            digits.len()
        )
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(BigInt::from(value))
    }
}

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => format_float(f, *x),
        }
    }
}

fn format_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_nan() {
        return f.write_str("nan");
    }
    if x.is_infinite() {
        return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && !(EXPONENT_BELOW..EXPONENT_ABOVE).contains(&magnitude) {
        return write!(f, "{x:e}");
    }
    if x.fract() == 0.0 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_float_keeps_decimal_point() {
        assert_eq!(Number::from(2.0).to_string(), "2.0");
        assert_eq!(Number::from(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn large_float_uses_exponent() {
        assert_eq!(Number::from(1e300).to_string(), "1e300");
        assert_eq!(Number::from(0.00001).to_string(), "1e-5");
    }

    #[test]
    fn special_floats() {
        assert_eq!(Number::from(f64::INFINITY).to_string(), "inf");
        assert_eq!(Number::from(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Number::from(f64::NAN).to_string(), "nan");
    }

    #[test]
    fn int_and_float_are_distinct() {
        assert_ne!(Number::from(2), Number::from(2.0));
    }

    #[test]
    fn huge_int_does_not_convert() {
        let huge = Number::Int(BigInt::from(1) << 2000);
        assert!(huge.as_f64().is_none());
        assert_eq!(Number::from(3).as_f64(), Some(3.0));
    }

    #[test]
    fn brief_elides_long_integers() {
        let long = Number::Int(BigInt::from(10).pow(40));
        let brief = long.brief();
        assert!(brief.starts_with("100000000000…"));
        assert!(brief.ends_with("(41 digits)"));
        assert_eq!(Number::from(-12).brief(), "-12");
    }
}
