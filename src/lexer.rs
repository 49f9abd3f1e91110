//! Lexer — tokenizes UIL source with error recovery.
//!
//! The lexer scans the source string character by character, producing a
//! vector of tokens that always ends in an [`TokenKind::Eof`] sentinel.
//! Key design decisions:
//!
//! - **Totality**: tokenization never fails. An unexpected character
//!   reports an `UnexpectedToken` diagnostic at that one-character span
//!   and yields a placeholder identifier token, so the scan always
//!   reaches end of file.
//!
//! - **Span tracking**: every token records its byte offset range in the
//!   source, which diagnostics use to point at the offending characters.
//!
//! - **Keyword recognition**: after scanning a letter run we check it
//!   against the keyword table. This is simpler than reserving keywords
//!   in the character-scanning phase.

use crate::diagnostics::{
    DiagnosticBag, DiagnosticCategory, DiagnosticCode, DiagnosticInfo, TextLocation,
};
use crate::token::{Span, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    start: usize,    // Start of current token (byte offset)
    current: usize,  // Current position (char index)
    byte_pos: usize, // Current byte position
    tokens: Vec<Token>,
    diagnostics: DiagnosticBag,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            byte_pos: 0,
            tokens: Vec::new(),
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn scan_tokens(&mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.byte_pos;
            self.scan_token();
        }
        self.tokens.push(Token::new(
            TokenKind::Eof,
            "",
            Span::new(self.byte_pos, self.byte_pos),
        ));
        self.tokens.clone()
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            // Whitespace — skip
            c if c.is_whitespace() => {}

            // Single-character punctuation
            '+' => self.add_token(TokenKind::Plus, "+"),
            '-' => self.add_token(TokenKind::Minus, "-"),
            '*' => self.add_token(TokenKind::Star, "*"),
            '/' => self.add_token(TokenKind::Slash, "/"),
            '(' => self.add_token(TokenKind::LParen, "("),
            ')' => self.add_token(TokenKind::RParen, ")"),
            '{' => self.add_token(TokenKind::LBrace, "{"),
            '}' => self.add_token(TokenKind::RBrace, "}"),
            '[' => self.add_token(TokenKind::LBracket, "["),
            ']' => self.add_token(TokenKind::RBracket, "]"),
            '<' => self.add_token(TokenKind::Lt, "<"),
            '>' => self.add_token(TokenKind::Gt, ">"),
            ',' => self.add_token(TokenKind::Comma, ","),
            ';' => self.add_token(TokenKind::Semicolon, ";"),

            // Number literals
            c if c.is_ascii_digit() => self.number(c),

            // Identifiers and keywords
            c if c.is_alphabetic() => self.identifier(c),

            _ => {
                self.diagnostics.report(
                    DiagnosticInfo::error(
                        DiagnosticCategory::Syntax,
                        DiagnosticCode::UnexpectedToken,
                        format!("Bad character '{c}'"),
                    ),
                    Some(TextLocation::new(
                        "",
                        Span::new(self.start, self.byte_pos),
                    )),
                );
                // Placeholder identifier so the scan always reaches EOF.
                self.add_token(TokenKind::Identifier, c.to_string());
            }
        }
    }

    fn number(&mut self, first: char) {
        let mut text = String::new();
        text.push(first);
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            text.push(self.advance());
        }
        let span = Span::new(self.start, self.byte_pos);
        match text.parse::<i64>() {
            Ok(value) => self.tokens.push(Token::with_value(
                TokenKind::Number,
                text,
                value,
                span,
            )),
            Err(_) => {
                self.diagnostics.report(
                    DiagnosticInfo::error(
                        DiagnosticCategory::Syntax,
                        DiagnosticCode::UnexpectedToken,
                        format!("Integer literal '{text}' is out of range"),
                    ),
                    Some(TextLocation::new("", span)),
                );
                // Valueless token; the binder substitutes zero.
                self.tokens.push(Token::new(TokenKind::Number, text, span));
            }
        }
    }

    fn identifier(&mut self, first: char) {
        let mut text = String::new();
        text.push(first);
        while !self.is_at_end() && self.peek().is_alphabetic() {
            text.push(self.advance());
        }

        let kind = match text.as_str() {
            "int" => TokenKind::Int,
            "return" => TokenKind::Return,
            "class" => TokenKind::Class,
            "interface" => TokenKind::Interface,
            "enum" => TokenKind::Enum,
            "namespace" => TokenKind::Namespace,
            _ => TokenKind::Identifier,
        };
        self.add_token(kind, text);
    }

    // ── Character-level helpers ──────────────────────────────────────

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        self.byte_pos += c.len_utf8();
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.current]
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn add_token(&mut self, kind: TokenKind, text: impl Into<String>) {
        self.tokens
            .push(Token::new(kind, text, Span::new(self.start, self.byte_pos)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.scan_tokens();
        assert!(
            lexer.diagnostics().is_empty(),
            "Lexer diagnostics: {:?}",
            lexer.diagnostics()
        );
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_numbers() {
        let mut lexer = Lexer::new("42");
        let tokens = lexer.scan_tokens();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].value, Some(42));
        assert_eq!(tokens[0].text, "42");
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            lex("int return class interface enum namespace"),
            vec![
                TokenKind::Int,
                TokenKind::Return,
                TokenKind::Class,
                TokenKind::Interface,
                TokenKind::Enum,
                TokenKind::Namespace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        let mut lexer = Lexer::new("foo Bar");
        let tokens = lexer.scan_tokens();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[1].text, "Bar");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lex("+ - * / ( ) { } , ; < > [ ]"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let mut lexer = Lexer::new("int Add");
        let tokens = lexer.scan_tokens();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(4, 7));
    }

    #[test]
    fn test_bad_character_recovers_to_eof() {
        let mut lexer = Lexer::new("1 @ 2");
        let tokens = lexer.scan_tokens();
        // 1, placeholder identifier for '@', 2, EOF
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(lexer.diagnostics().len(), 1);
        let diag = lexer.diagnostics().iter().next().unwrap();
        assert_eq!(diag.info.code, DiagnosticCode::UnexpectedToken);
        let location = diag.location.as_ref().unwrap();
        assert_eq!(location.span, Span::new(2, 3));
    }

    #[test]
    fn test_out_of_range_literal_keeps_token() {
        let mut lexer = Lexer::new("99999999999999999999999999");
        let tokens = lexer.scan_tokens();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].value, None);
        assert_eq!(lexer.diagnostics().len(), 1);
    }

    #[test]
    fn test_whitespace_only_yields_eof() {
        assert_eq!(lex("  \t\n  "), vec![TokenKind::Eof]);
        assert_eq!(lex(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_full_method() {
        let tokens = lex("int Add(int a, int b) { return a + b; }");
        assert_eq!(tokens.len(), 17);
        assert_eq!(tokens[0], TokenKind::Int);
        assert_eq!(tokens[10], TokenKind::Return);
    }
}
