use std::sync::Arc;

use crate::builtins::Function;
use crate::number::Number;

/// Token kinds produced by the lexer and the structural builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Run of spaces, tabs, or newlines.
    Whitespace,
    /// Decimal integer, optionally with a `k`/`m`/`g`/`t` postfix.
    Decimal,
    /// `0x` integer.
    Hex,
    /// `0o` integer.
    Octal,
    /// `0b` integer.
    Binary,
    /// Float literal (`1.5`, `.5`, `2.`, `1e3`).
    Float,
    /// `+`, before prefix disambiguation.
    Plus,
    /// `-`, before prefix disambiguation.
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    DoubleStar,
    ShiftLeft,
    ShiftRight,
    Ampersand,
    Caret,
    Pipe,
    /// `~`, before prefix disambiguation.
    Tilde,
    /// Prefix `-`.
    Negate,
    /// Prefix `+`.
    Positivate,
    /// Prefix `~`.
    Invert,
    OpenParen,
    CloseParen,
    /// Bare name, before resolution.
    Identifier,
    /// Name resolved to a built-in constant.
    Constant,
    /// Name resolved to a built-in function.
    Function,
    /// Result of a reduction.
    Value,
    /// `( ... )` holding an unreduced sub-expression.
    Group,
    /// `name( ... )` holding an unreduced argument.
    Call,
}

impl TokenKind {
    /// Literal kinds carrying a number after lexing.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::Hex | Self::Octal | Self::Binary | Self::Float
        )
    }

    /// Kinds that stand for a complete operand.
    #[must_use]
    pub const fn is_operand(self) -> bool {
        self.is_literal() || matches!(self, Self::Constant | Self::Value | Self::Group | Self::Call)
    }

    /// Resolved prefix operators.
    #[must_use]
    pub const fn is_prefix(self) -> bool {
        matches!(self, Self::Negate | Self::Positivate | Self::Invert)
    }

    /// Operators that only ever take two operands.
    #[must_use]
    pub const fn is_infix(self) -> bool {
        matches!(
            self,
            Self::Star
                | Self::Slash
                | Self::DoubleSlash
                | Self::Percent
                | Self::DoubleStar
                | Self::ShiftLeft
                | Self::ShiftRight
                | Self::Ampersand
                | Self::Caret
                | Self::Pipe
        )
    }

    /// Any operator, in either role.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        self.is_infix()
            || self.is_prefix()
            || matches!(self, Self::Plus | Self::Minus | Self::Tilde)
    }

    /// Prefix role of `+`, `-`, and `~`.
    #[must_use]
    pub const fn as_prefix(self) -> Option<Self> {
        match self {
            Self::Plus => Some(Self::Positivate),
            Self::Minus => Some(Self::Negate),
            Self::Tilde => Some(Self::Invert),
            _ => None,
        }
    }

    /// Kinds that may begin an operand.
    #[must_use]
    pub const fn starts_operand(self) -> bool {
        self.is_operand()
            || self.is_prefix()
            || matches!(
                self,
                Self::Plus | Self::Minus | Self::Tilde | Self::OpenParen | Self::Function
            )
    }

    /// Source spelling of an operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus | Self::Positivate => "+",
            Self::Minus | Self::Negate => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::DoubleSlash => "//",
            Self::Percent => "%",
            Self::DoubleStar => "**",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Ampersand => "&",
            Self::Caret => "^",
            Self::Pipe => "|",
            Self::Tilde | Self::Invert => "~",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            _ => "",
        }
    }
}

/// Evaluated payload of a token.
#[derive(Debug, Clone)]
pub enum Payload {
    Number(Number),
    Function(&'static Function),
}

/// A span of the input tagged with its kind.
///
/// Every token of one evaluation shares the same `source`. `children`
/// is present exactly for [`TokenKind::Group`] and
/// [`TokenKind::Call`].
#[derive(Debug, Clone)]
pub struct Token {
    pub source: Arc<[char]>,
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    pub value: Option<Payload>,
    pub children: Option<Vec<Self>>,
}

impl Token {
    /// Token without a payload.
    #[must_use]
    pub fn new(source: &Arc<[char]>, start: usize, end: usize, kind: TokenKind) -> Self {
        Self {
            source: Arc::clone(source),
            start,
            end,
            kind,
            value: None,
            children: None,
        }
    }

    /// `self` carrying `value`, with span and kind unchanged.
    #[must_use]
    pub fn with_value(self, kind: TokenKind, value: Payload) -> Self {
        Self {
            kind,
            value: Some(value),
            ..self
        }
    }

    /// Reduction result spanning `start..end`.
    #[must_use]
    pub fn evaluated(source: &Arc<[char]>, start: usize, end: usize, number: Number) -> Self {
        Self {
            value: Some(Payload::Number(number)),
            ..Self::new(source, start, end, TokenKind::Value)
        }
    }

    /// Parenthesized group holding `children`.
    #[must_use]
    pub fn group(source: &Arc<[char]>, start: usize, end: usize, children: Vec<Self>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(source, start, end, TokenKind::Group)
        }
    }

    /// Call of `function` with the unreduced argument `children`.
    #[must_use]
    pub fn call(
        source: &Arc<[char]>,
        start: usize,
        end: usize,
        function: &'static Function,
        children: Vec<Self>,
    ) -> Self {
        Self {
            value: Some(Payload::Function(function)),
            children: Some(children),
            ..Self::new(source, start, end, TokenKind::Call)
        }
    }

    /// Source text covered by the token.
    #[must_use]
    pub fn text(&self) -> String {
        self.source[self.start..self.end].iter().collect()
    }

    #[must_use]
    pub const fn number(&self) -> Option<&Number> {
        match &self.value {
            Some(Payload::Number(number)) => Some(number),
            _ => None,
        }
    }

    #[must_use]
    pub const fn function(&self) -> Option<&'static Function> {
        match self.value {
            Some(Payload::Function(function)) => Some(function),
            _ => None,
        }
    }
}

/// Share `text` as the character array all tokens point into.
#[must_use]
pub fn source(text: &str) -> Arc<[char]> {
    text.chars().collect()
}
