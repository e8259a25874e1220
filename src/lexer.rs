use std::sync::{Arc, LazyLock};

use num_bigint::BigInt;

use crate::builtins;
use crate::error::{EvaluationError, HighlightGroup};
use crate::limits::Limits;
use crate::number::Number;
use crate::scanner::{
    Cursor, Rule, any_of, end, exact, first_of, followed_by, one, optional, range, repeat,
    sequence,
};
use crate::token::{Payload, Token, TokenKind};

/// Characters that may directly follow a numeric literal.
const LITERAL_TERMINATORS: &str = " \t\r\n+-*/%<>&^|~().";

/// Decimal postfix multipliers, as powers of ten.
const POSTFIXES: &[(char, u32)] = &[('k', 3), ('m', 6), ('g', 9), ('t', 12)];

/// Alternatives tried at each position, in order.
static GRAMMAR: LazyLock<Vec<(Rule, TokenKind)>> = LazyLock::new(grammar);

fn grammar() -> Vec<(Rule, TokenKind)> {
    let mut rules = vec![
        (
            sequence(vec![whitespace(), repeat(whitespace())]),
            TokenKind::Whitespace,
        ),
        (
            radix_literal("0x", "0X", || {
                first_of(vec![range('0', '9'), range('a', 'f'), range('A', 'F')])
            }),
            TokenKind::Hex,
        ),
        (
            radix_literal("0o", "0O", || range('0', '7')),
            TokenKind::Octal,
        ),
        (
            radix_literal("0b", "0B", || range('0', '1')),
            TokenKind::Binary,
        ),
        (sequence(vec![float(), terminated()]), TokenKind::Float),
        (
            sequence(vec![digits(), repeat(letter()), terminated()]),
            TokenKind::Decimal,
        ),
    ];

    // Longest spellings first.
    for kind in [
        TokenKind::DoubleStar,
        TokenKind::DoubleSlash,
        TokenKind::ShiftLeft,
        TokenKind::ShiftRight,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Ampersand,
        TokenKind::Caret,
        TokenKind::Pipe,
        TokenKind::Tilde,
        TokenKind::OpenParen,
        TokenKind::CloseParen,
    ] {
        rules.push((exact(kind.symbol()), kind));
    }

    rules.push((
        sequence(vec![
            first_of(vec![letter(), one('_'), any_of("πτφ∞")]),
            repeat(first_of(vec![letter(), range('0', '9'), one('_')])),
        ]),
        TokenKind::Identifier,
    ));
    rules
}

fn whitespace() -> Rule {
    any_of(" \t\r\n")
}

fn letter() -> Rule {
    first_of(vec![range('a', 'z'), range('A', 'Z')])
}

/// Decimal digits with `_` group separators.
fn digits() -> Rule {
    sequence(vec![
        range('0', '9'),
        repeat(first_of(vec![range('0', '9'), one('_')])),
    ])
}

fn terminated() -> Rule {
    followed_by(
        first_of(vec![end(), any_of(LITERAL_TERMINATORS)]),
        "unexpected character after numeric literal",
    )
}

fn radix_literal(lower: &'static str, upper: &'static str, digit: fn() -> Rule) -> Rule {
    sequence(vec![
        first_of(vec![exact(lower), exact(upper)]),
        digit(),
        repeat(first_of(vec![digit(), one('_')])),
        terminated(),
    ])
}

/// `1.5`, `1.`, `.5`, each with an optional exponent, or `1e5`.
fn float() -> Rule {
    let exponent = || sequence(vec![any_of("eE"), optional(any_of("+-")), digits()]);
    let mantissa = first_of(vec![
        sequence(vec![digits(), one('.'), optional(digits())]),
        sequence(vec![one('.'), digits()]),
    ]);
    first_of(vec![
        sequence(vec![mantissa, optional(exponent())]),
        sequence(vec![digits(), exponent()]),
    ])
}

/// Split the input into raw tokens.
///
/// Token spans tile the input exactly. Literals, identifiers, and
/// operators carry no payload yet; see [`tokenize`].
///
/// # Errors
///
/// Returns `EvaluationError` at the first character no alternative
/// matches, or at a character that improperly ends a numeric literal.
pub fn scan(source: &Arc<[char]>) -> Result<Vec<Token>, EvaluationError> {
    Lexer::new(source).scan()
}

/// Split the input into tokens and resolve literals and identifiers.
///
/// Literals receive their numeric value; identifiers become
/// [`TokenKind::Constant`] or [`TokenKind::Function`].
///
/// # Errors
///
/// Returns `EvaluationError` on any lexical error, an unknown
/// postfix or identifier, or a literal over its digit limit.
pub fn tokenize(source: &Arc<[char]>, limits: &Limits) -> Result<Vec<Token>, EvaluationError> {
    let tokens = scan(source)?
        .into_iter()
        .map(|token| resolve(token, limits))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("lexed {} tokens from {} characters", tokens.len(), source.len());
    Ok(tokens)
}

struct Lexer<'a> {
    source: &'a Arc<[char]>,
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    const fn new(source: &'a Arc<[char]>) -> Self {
        Self {
            source,
            cursor: Cursor::new(source, 0),
        }
    }

    fn scan(mut self) -> Result<Vec<Token>, EvaluationError> {
        let mut tokens = Vec::new();

        while !self.cursor.at_end() {
            let start = self.cursor.pos();
            let kind = self.next_kind()?.ok_or_else(|| {
                let found = self.cursor.peek().unwrap_or_default();
                EvaluationError::new(
                    Arc::clone(self.source),
                    vec![HighlightGroup::primary(start, start + 1)],
                    format!("unexpected character '{found}'"),
                )
            })?;
            tokens.push(Token::new(self.source, start, self.cursor.pos(), kind));
        }

        Ok(tokens)
    }

    fn next_kind(&mut self) -> Result<Option<TokenKind>, EvaluationError> {
        for (rule, kind) in GRAMMAR.iter() {
            if rule.scan(&mut self.cursor)? {
                return Ok(Some(*kind));
            }
        }
        Ok(None)
    }
}

fn resolve(token: Token, limits: &Limits) -> Result<Token, EvaluationError> {
    let number = match token.kind {
        TokenKind::Decimal => decimal_value(&token, limits)?,
        TokenKind::Hex => radix_value(&token, 16, "hexadecimal", limits.max_hex_digits)?,
        TokenKind::Octal => radix_value(&token, 8, "octal", limits.max_octal_digits)?,
        TokenKind::Binary => radix_value(&token, 2, "binary", limits.max_binary_digits)?,
        TokenKind::Float => float_value(&token, limits)?,
        TokenKind::Identifier => return resolve_identifier(token),
        _ => return Ok(token),
    };
    let kind = token.kind;
    Ok(token.with_value(kind, Payload::Number(number)))
}

fn resolve_identifier(token: Token) -> Result<Token, EvaluationError> {
    let name = token.text();
    if let Some(value) = builtins::constant(&name) {
        return Ok(token.with_value(TokenKind::Constant, Payload::Number(Number::Float(value))));
    }
    if let Some(function) = builtins::function(&name) {
        return Ok(token.with_value(TokenKind::Function, Payload::Function(function)));
    }
    Err(EvaluationError::at(&token, format!("unknown identifier '{name}'")))
}

fn digit_limit_error(token: &Token, radix_name: &str, limit: usize) -> EvaluationError {
    EvaluationError::at(
        token,
        format!("{radix_name} literal exceeds the limit of {limit} digits"),
    )
}

fn parse_digits(token: &Token, digits: &str, radix: u32) -> Result<BigInt, EvaluationError> {
    BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| EvaluationError::at(token, format!("invalid literal '{}'", token.text())))
}

fn decimal_value(token: &Token, limits: &Limits) -> Result<Number, EvaluationError> {
    let chars = &token.source[token.start..token.end];
    // Postfix letters run from the end of the literal back to its last digit.
    let split = chars
        .iter()
        .rposition(char::is_ascii_digit)
        .map_or(0, |last| last + 1);
    let (body, postfix) = chars.split_at(split);

    let scale = if postfix.is_empty() {
        0
    } else {
        postfix_scale(postfix).ok_or_else(|| {
            let postfix: String = postfix.iter().collect();
            EvaluationError::new(
                Arc::clone(&token.source),
                vec![
                    HighlightGroup::secondary(token.start, token.start + split),
                    HighlightGroup::primary(token.start + split, token.end),
                ],
                format!("unknown numeric postfix '{postfix}'"),
            )
        })?
    };

    let digits: String = body.iter().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > limits.max_decimal_digits {
        return Err(digit_limit_error(token, "decimal", limits.max_decimal_digits));
    }
    let value = parse_digits(token, &digits, 10)?;
    Ok(Number::Int(value * BigInt::from(10).pow(scale)))
}

fn postfix_scale(postfix: &[char]) -> Option<u32> {
    match postfix {
        [letter] => POSTFIXES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(letter))
            .map(|&(_, scale)| scale),
        _ => None,
    }
}

fn radix_value(
    token: &Token,
    radix: u32,
    radix_name: &str,
    limit: usize,
) -> Result<Number, EvaluationError> {
    // Skip the two-character radix prefix.
    let digits: String = token.source[token.start + 2..token.end]
        .iter()
        .filter(|&&c| c != '_')
        .collect();
    if digits.len() > limit {
        return Err(digit_limit_error(token, radix_name, limit));
    }
    Ok(Number::Int(parse_digits(token, &digits, radix)?))
}

fn float_value(token: &Token, limits: &Limits) -> Result<Number, EvaluationError> {
    let chars = &token.source[token.start..token.end];
    let digit_count = chars.iter().filter(|c| c.is_ascii_digit()).count();
    if digit_count > limits.max_float_digits {
        return Err(digit_limit_error(token, "float", limits.max_float_digits));
    }

    let text: String = chars.iter().filter(|&&c| c != '_').collect();
    let value: f64 = text
        .parse()
        .map_err(|_| EvaluationError::at(token, format!("invalid float literal '{text}'")))?;
    if value.is_infinite() {
        return Err(EvaluationError::at(
            token,
            format!("float literal '{text}' is out of range"),
        ));
    }
    Ok(Number::Float(value))
}
