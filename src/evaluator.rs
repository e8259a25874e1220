//! Reduction of a token tree to a single value.
//!
//! Each token list is reduced in a fixed order. Groups and calls go
//! first (post-order). Next come prefixes on the right operand of
//! `**`, then `**` itself left to right, then the remaining prefixes.
//! Last are the two-sided tiers in [`BINARY_TIERS`]. Every ceiling in
//! [`Limits`] is checked before the operation it guards runs.

use std::sync::Arc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::builtins::Function;
use crate::error::{EvaluationError, HighlightGroup};
use crate::limits::Limits;
use crate::number::Number;
use crate::token::{Payload, Token, TokenKind};

/// Two-sided operator tiers, tightest binding first.
const BINARY_TIERS: &[&[TokenKind]] = &[
    &[
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::DoubleSlash,
        TokenKind::Percent,
    ],
    &[TokenKind::Plus, TokenKind::Minus],
    &[TokenKind::ShiftLeft, TokenKind::ShiftRight],
    &[TokenKind::Ampersand],
    &[TokenKind::Caret],
    &[TokenKind::Pipe],
];

/// Reduce a token tree to one [`TokenKind::Value`] token.
///
/// The result spans every source character it was computed from.
///
/// # Errors
///
/// Returns `EvaluationError` on the first limit violation, domain
/// error, or failed function call.
pub fn reduce(
    source: &Arc<[char]>,
    tokens: Vec<Token>,
    limits: &Limits,
) -> Result<Token, EvaluationError> {
    Reducer { source, limits }.reduce(tokens)
}

/// Reduce a token tree and return its value.
///
/// # Errors
///
/// See [`reduce`].
pub fn evaluate(
    source: &Arc<[char]>,
    tokens: Vec<Token>,
    limits: &Limits,
) -> Result<Number, EvaluationError> {
    let token = reduce(source, tokens, limits)?;
    match token.value {
        Some(Payload::Number(number)) => Ok(number),
        _ => Err(EvaluationError::at(&token, "expression has no value")),
    }
}

struct Reducer<'a> {
    source: &'a Arc<[char]>,
    limits: &'a Limits,
}

/// Operand pair after numeric promotion.
enum Operands<'n> {
    Ints(&'n BigInt, &'n BigInt),
    Floats(f64, f64),
}

/// One application of a two-sided operator.
struct Binary<'t> {
    lhs: &'t Token,
    op: &'t Token,
    rhs: &'t Token,
    left: &'t Number,
    right: &'t Number,
}

impl<'t> Binary<'t> {
    fn expression(&self) -> String {
        format!(
            "{} {} {}",
            self.left.brief(),
            self.op.kind.symbol(),
            self.right.brief()
        )
    }

    fn error(&self, what: &str) -> EvaluationError {
        EvaluationError::at_operator(
            self.lhs,
            self.op,
            self.rhs,
            format!("{what} in '{}'", self.expression()),
        )
    }

    /// Both integers, or both promoted to floats.
    fn operands(&self) -> Result<Operands<'t>, EvaluationError> {
        match (self.left, self.right) {
            (Number::Int(x), Number::Int(y)) => Ok(Operands::Ints(x, y)),
            _ => self.floats().map(|(x, y)| Operands::Floats(x, y)),
        }
    }

    fn floats(&self) -> Result<(f64, f64), EvaluationError> {
        match (self.left.as_f64(), self.right.as_f64()) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(self.error("integer too large to convert to float")),
        }
    }

    fn integers(&self) -> Result<(&'t BigInt, &'t BigInt), EvaluationError> {
        match (self.left, self.right) {
            (Number::Int(x), Number::Int(y)) => Ok((x, y)),
            _ => Err(self.error(&format!(
                "'{}' requires integer operands",
                self.op.kind.symbol()
            ))),
        }
    }

    fn nonzero_divisor(&self, what: &str) -> Result<(), EvaluationError> {
        if self.right.is_zero() {
            return Err(self.error(&format!("{what} by zero")));
        }
        Ok(())
    }
}

impl Reducer<'_> {
    fn reduce(&self, tokens: Vec<Token>) -> Result<Token, EvaluationError> {
        let tokens = tokens
            .into_iter()
            .map(|token| self.resolve_group(token))
            .collect::<Result<Vec<_>, _>>()?;
        let tokens = self.fold_exponent_prefixes(tokens)?;
        let tokens = self.reduce_tier(tokens, &[TokenKind::DoubleStar])?;
        let mut tokens = self.apply_prefixes(tokens)?;
        for tier in BINARY_TIERS {
            tokens = self.reduce_tier(tokens, tier)?;
        }

        let mut rest = tokens.into_iter();
        match (rest.next(), rest.next()) {
            (Some(token), None) if token.number().is_some() => Ok(token),
            (Some(_), Some(extra)) => Err(malformed(&extra)),
            (Some(token), None) => Err(malformed(&token)),
            (None, _) => Err(EvaluationError::new(
                Arc::clone(self.source),
                vec![HighlightGroup::primary(0, self.source.len())],
                "empty expression",
            )),
        }
    }

    /// Reduce a group or call to a value token; other tokens pass.
    fn resolve_group(&self, mut token: Token) -> Result<Token, EvaluationError> {
        let Some(children) = token.children.take() else {
            return Ok(token);
        };
        let argument = self.reduce(children)?;
        let Some(value) = argument.number() else {
            return Err(malformed(&argument));
        };
        let result = match token.function() {
            Some(function) => self.call(&token, function, &argument, value)?,
            None => value.clone(),
        };
        Ok(Token::evaluated(self.source, token.start, token.end, result))
    }

    fn call(
        &self,
        site: &Token,
        function: &Function,
        argument: &Token,
        value: &Number,
    ) -> Result<Number, EvaluationError> {
        if let Some(check) = function.check {
            check(argument, value, self.limits)?;
        }
        let result = (function.apply)(value).map_err(|reason| {
            let name_end = site.start + function.name.chars().count();
            EvaluationError::new(
                Arc::clone(self.source),
                vec![
                    HighlightGroup::primary(site.start, name_end),
                    HighlightGroup::secondary(argument.start, argument.end),
                ],
                format!("{}({}) failed: {reason}", function.name, value.brief()),
            )
        })?;
        log::trace!(
            "called {}({}) = {}",
            function.name,
            value.brief(),
            result.brief()
        );
        Ok(result)
    }

    /// Resolve prefixes standing right of `**` into its operand.
    fn fold_exponent_prefixes(&self, tokens: Vec<Token>) -> Result<Vec<Token>, EvaluationError> {
        let mut folded = Vec::with_capacity(tokens.len());
        let mut rest = tokens.into_iter().peekable();
        while let Some(token) = rest.next() {
            let is_power = token.kind == TokenKind::DoubleStar;
            folded.push(token);
            if !is_power {
                continue;
            }
            let mut prefixes = Vec::new();
            while let Some(prefix) = rest.next_if(|next| next.kind.is_prefix()) {
                prefixes.push(prefix);
            }
            if prefixes.is_empty() {
                continue;
            }
            match rest.next() {
                Some(operand) => folded.push(self.fold_prefixes(prefixes, operand)?),
                None => folded.extend(prefixes),
            }
        }
        Ok(folded)
    }

    /// Apply `prefixes` to `operand`, innermost first.
    fn fold_prefixes(&self, prefixes: Vec<Token>, operand: Token) -> Result<Token, EvaluationError> {
        prefixes
            .into_iter()
            .rev()
            .try_fold(operand, |operand, prefix| self.apply_prefix(&prefix, &operand))
    }

    /// Apply every remaining prefix, right to left.
    fn apply_prefixes(&self, tokens: Vec<Token>) -> Result<Vec<Token>, EvaluationError> {
        // Built back to front: the last element is the operand to the right.
        let mut applied: Vec<Token> = Vec::with_capacity(tokens.len());
        for token in tokens.into_iter().rev() {
            if !token.kind.is_prefix() {
                applied.push(token);
                continue;
            }
            let Some(operand) = applied.pop() else {
                return Err(malformed(&token));
            };
            applied.push(self.apply_prefix(&token, &operand)?);
        }
        applied.reverse();
        Ok(applied)
    }

    fn apply_prefix(&self, prefix: &Token, operand: &Token) -> Result<Token, EvaluationError> {
        let Some(value) = operand.number() else {
            return Err(malformed(operand));
        };
        let symbol = prefix.kind.symbol();
        if value.bits().is_some_and(|bits| bits > self.limits.max_int_bits) {
            return Err(EvaluationError::at_pair(
                prefix,
                operand,
                format!(
                    "integer operand exceeds the {}-bit limit in '{symbol}{}'",
                    self.limits.max_int_bits,
                    value.brief()
                ),
            ));
        }

        let result = match (prefix.kind, value) {
            (TokenKind::Negate, Number::Int(n)) => Number::Int(-n),
            (TokenKind::Negate, Number::Float(x)) => Number::Float(-x),
            (TokenKind::Invert, Number::Int(n)) => Number::Int(!n),
            (TokenKind::Invert, Number::Float(_)) => {
                return Err(EvaluationError::at_pair(
                    prefix,
                    operand,
                    format!("'~' requires an integer operand in '~{}'", value.brief()),
                ));
            }
            (TokenKind::Positivate, _) => value.clone(),
            _ => return Err(malformed(prefix)),
        };
        log::trace!("reduced {symbol}{} = {}", value.brief(), result.brief());
        Ok(Token::evaluated(
            self.source,
            prefix.start,
            operand.end,
            result,
        ))
    }

    /// Reduce every operator of one tier, left to right.
    fn reduce_tier(
        &self,
        tokens: Vec<Token>,
        tier: &[TokenKind],
    ) -> Result<Vec<Token>, EvaluationError> {
        let mut reduced: Vec<Token> = Vec::with_capacity(tokens.len());
        let mut rest = tokens.into_iter();
        while let Some(token) = rest.next() {
            if !tier.contains(&token.kind) {
                reduced.push(token);
                continue;
            }
            let (Some(lhs), Some(rhs)) = (reduced.pop(), rest.next()) else {
                return Err(malformed(&token));
            };
            reduced.push(self.apply_binary(&lhs, &token, &rhs)?);
        }
        Ok(reduced)
    }

    fn apply_binary(&self, lhs: &Token, op: &Token, rhs: &Token) -> Result<Token, EvaluationError> {
        let (Some(left), Some(right)) = (lhs.number(), rhs.number()) else {
            return Err(malformed(op));
        };
        let binary = Binary {
            lhs,
            op,
            rhs,
            left,
            right,
        };
        let limit = self.limits.max_int_bits;
        let oversized = |value: &Number| value.bits().is_some_and(|bits| bits > limit);
        if oversized(left) || oversized(right) {
            return Err(binary.error(&format!("integer operand exceeds the {limit}-bit limit")));
        }

        let result = match op.kind {
            TokenKind::DoubleStar => self.power(&binary)?,
            TokenKind::Star => match binary.operands()? {
                Operands::Ints(x, y) => Number::Int(x * y),
                Operands::Floats(x, y) => Number::Float(x * y),
            },
            TokenKind::Slash => {
                binary.nonzero_divisor("division")?;
                let (x, y) = binary.floats()?;
                Number::Float(x / y)
            }
            TokenKind::DoubleSlash => {
                binary.nonzero_divisor("floor division")?;
                match binary.operands()? {
                    Operands::Ints(x, y) => Number::Int(x.div_floor(y)),
                    Operands::Floats(x, y) => Number::Float((x / y).floor()),
                }
            }
            TokenKind::Percent => {
                binary.nonzero_divisor("modulo")?;
                match binary.operands()? {
                    Operands::Ints(x, y) => Number::Int(x.mod_floor(y)),
                    Operands::Floats(x, y) => Number::Float(float_mod(x, y)),
                }
            }
            TokenKind::Plus => match binary.operands()? {
                Operands::Ints(x, y) => Number::Int(x + y),
                Operands::Floats(x, y) => Number::Float(x + y),
            },
            TokenKind::Minus => match binary.operands()? {
                Operands::Ints(x, y) => Number::Int(x - y),
                Operands::Floats(x, y) => Number::Float(x - y),
            },
            TokenKind::ShiftLeft | TokenKind::ShiftRight => self.shift(&binary)?,
            TokenKind::Ampersand => {
                let (x, y) = binary.integers()?;
                Number::Int(x & y)
            }
            TokenKind::Caret => {
                let (x, y) = binary.integers()?;
                Number::Int(x ^ y)
            }
            TokenKind::Pipe => {
                let (x, y) = binary.integers()?;
                Number::Int(x | y)
            }
            _ => return Err(malformed(op)),
        };

        log::trace!("reduced {} = {}", binary.expression(), result.brief());
        Ok(Token::evaluated(self.source, lhs.start, rhs.end, result))
    }

    #[allow(clippy::cast_precision_loss)]
    fn power(&self, binary: &Binary<'_>) -> Result<Number, EvaluationError> {
        let max_exponent = self.limits.max_exponent;

        let (Number::Int(base), Number::Int(exponent)) = (binary.left, binary.right) else {
            let (x, y) = binary.floats()?;
            if y.abs() > max_exponent as f64 {
                return Err(binary.error(&format!("exponent exceeds the limit of {max_exponent}")));
            }
            if x == 0.0 && y < 0.0 {
                return Err(binary.error("zero cannot be raised to a negative power"));
            }
            let result = x.powf(y);
            if result.is_nan() && !x.is_nan() && !y.is_nan() {
                return Err(binary.error("negative base with fractional exponent"));
            }
            if result.is_infinite() && x.is_finite() && y.is_finite() {
                return Err(binary.error("result is too large to represent"));
            }
            return Ok(Number::Float(result));
        };

        let exponent = exponent
            .to_i32()
            .filter(|e| u64::from(e.unsigned_abs()) <= max_exponent)
            .ok_or_else(|| binary.error(&format!("exponent exceeds the limit of {max_exponent}")))?;

        if exponent < 0 {
            if base.is_zero() {
                return Err(binary.error("zero cannot be raised to a negative power"));
            }
            let (x, _) = binary.floats()?;
            return Ok(Number::Float(x.powi(exponent)));
        }

        let exponent = exponent.unsigned_abs();
        let exponent_bits = u64::from(u32::BITS - exponent.leading_zeros());
        let estimate = base.bits().saturating_mul(exponent_bits);
        if estimate > self.limits.max_power_bits {
            return Err(binary.error(&format!(
                "result would exceed the {}-bit limit",
                self.limits.max_power_bits
            )));
        }
        Ok(Number::Int(base.pow(exponent)))
    }

    fn shift(&self, binary: &Binary<'_>) -> Result<Number, EvaluationError> {
        let (value, amount) = binary.integers()?;
        let max_shift = self.limits.max_shift;
        let leftward = binary.op.kind == TokenKind::ShiftLeft;

        if leftward && *amount > BigInt::from(max_shift) {
            return Err(binary.error(&format!("shift amount exceeds the limit of {max_shift}")));
        }
        if !leftward && *amount < -BigInt::from(max_shift) {
            return Err(binary.error(&format!("shift amount is below the limit of -{max_shift}")));
        }

        // Positive counts shift left; negative counts shift right.
        let count = if leftward { amount.clone() } else { -amount };
        let distance = count.magnitude().to_u64().unwrap_or(u64::MAX);
        if count.is_negative() {
            // Past the bit length only the sign remains.
            Ok(Number::Int(value >> distance.min(value.bits() + 1)))
        } else {
            Ok(Number::Int(value << distance))
        }
    }
}

fn malformed(token: &Token) -> EvaluationError {
    EvaluationError::at(token, format!("malformed expression near '{}'", token.text()))
}

/// Float remainder taking the sign of the divisor.
const fn float_mod(x: f64, y: f64) -> f64 {
    let remainder = x % y;
    if remainder != 0.0 && (remainder < 0.0) != (y < 0.0) {
        remainder + y
    } else {
        remainder
    }
}
