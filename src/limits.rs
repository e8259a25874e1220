//! Resource ceilings that bound evaluation time and memory.

/// Fixed numeric ceilings enforced during lexing and evaluation.
///
/// Every value in [`Limits::DEFAULT`] keeps the cost of a single
/// evaluation bounded for inputs of bounded length. Callers that
/// need stricter bounds pass their own `Limits` to
/// [`evaluate_with_limits`](crate::evaluate_with_limits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum digits in a decimal integer literal.
    pub max_decimal_digits: usize,
    /// Maximum digits in a `0x` literal.
    pub max_hex_digits: usize,
    /// Maximum digits in a `0o` literal.
    pub max_octal_digits: usize,
    /// Maximum digits in a `0b` literal.
    pub max_binary_digits: usize,
    /// Maximum digits in a float literal.
    pub max_float_digits: usize,
    /// Maximum bit length of an integer operand.
    pub max_int_bits: u64,
    /// Maximum shift magnitude, in either direction.
    pub max_shift: u64,
    /// Maximum absolute exponent accepted by `**`.
    pub max_exponent: u64,
    /// Maximum product of base and exponent bit lengths for an integer power.
    pub max_power_bits: u64,
    /// Largest argument accepted by `factorial`.
    pub max_factorial: u64,
    /// Deepest parenthesis nesting accepted.
    pub max_nesting_depth: usize,
}

impl Limits {
    pub const DEFAULT: Self = Self {
        max_decimal_digits: 3000,
        max_hex_digits: 2500,
        max_octal_digits: 3333,
        max_binary_digits: 10_000,
        max_float_digits: 1000,
        max_int_bits: 10_000,
        max_shift: 10_000,
        max_exponent: 10_000,
        max_power_bits: 10_000,
        max_factorial: 1000,
        max_nesting_depth: 64,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
