//! Token types for UIL source.
//!
//! Each token carries its kind, lexeme (the raw source text), an optional
//! integer literal value, and a span indicating its position in the source.
//! Spans enable precise diagnostics: we can point at the exact characters
//! that caused an error.

use std::fmt;

/// Byte offset range in the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// All token kinds in the UIL language.
///
/// The set is closed: the parser matches exhaustively, so adding a kind is
/// a compile-time obligation on every consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals and names
    Number,
    Identifier,

    // Keywords
    Int,
    Return,
    Class,
    Interface,
    Enum,
    Namespace,

    // Punctuation
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Lt,        // <
    Gt,        // >
    Comma,     // ,
    Semicolon, // ;

    // Special
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "int",
            TokenKind::Return => "return",
            TokenKind::Class => "class",
            TokenKind::Interface => "interface",
            TokenKind::Enum => "enum",
            TokenKind::Namespace => "namespace",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Eof => "EOF",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text. Empty for synthesized placeholder tokens.
    pub text: String,
    /// Literal value for `Number` tokens that parsed in range.
    pub value: Option<i64>,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
            span,
        }
    }

    pub fn with_value(kind: TokenKind, text: impl Into<String>, value: i64, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            value: Some(value),
            span,
        }
    }

    /// A zero-length placeholder for a token the parser expected but did
    /// not find. Carries no text and no value.
    pub fn missing(kind: TokenKind, position: usize) -> Self {
        Self {
            kind,
            text: String::new(),
            value: None,
            span: Span::new(position, position),
        }
    }
}
