//! Parser — recursive descent (declarations) + precedence climbing
//! (expressions).
//!
//! The parser converts a flat token stream into a syntax tree and never
//! aborts: a required-token mismatch reports an `UnexpectedToken`
//! diagnostic and synthesizes a zero-length placeholder token of the
//! expected kind, so a complete (possibly degenerate) tree is always
//! produced. Loops that could otherwise stall on a token no production
//! consumes skip one token to guarantee termination.
//!
//! Expressions use precedence climbing, left-associative, with `+ -` at
//! precedence 1 and `* /` at precedence 2. Same-precedence operators are
//! consumed by the caller's loop, so a chain of ten thousand `+` terms
//! parses with constant recursion depth.
//!
//! Only the return statement exists in the grammar; any other leading
//! token inside a block falls back to attempting a return statement.
//! This permissive recovery masks genuine syntax errors but keeps every
//! malformed body representable.

use crate::ast::*;
use crate::diagnostics::{
    DiagnosticBag, DiagnosticCategory, DiagnosticCode, DiagnosticInfo, TextLocation,
};
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

/// A parsed source text: the root node plus every lexical and syntactic
/// diagnostic collected on the way, in source order.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub root: CompilationUnit,
    pub diagnostics: DiagnosticBag,
}

impl SyntaxTree {
    pub fn parse(text: &str) -> SyntaxTree {
        let mut lexer = Lexer::new(text);
        let tokens = lexer.scan_tokens();
        let mut diagnostics = lexer.take_diagnostics();

        let mut parser = Parser::new(tokens);
        let root = parser.parse_compilation_unit();
        diagnostics.extend(parser.take_diagnostics());

        SyntaxTree { root, diagnostics }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    diagnostics: DiagnosticBag,
}

impl Parser {
    /// `tokens` must end in an `Eof` sentinel, as produced by [`Lexer`].
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let start = self.current().span;
        let mut members = Vec::new();
        while !self.check(TokenKind::Eof) {
            let before = self.position;
            members.push(self.member());
            if self.position == before {
                // No production consumed the current token; skip it so the
                // loop terminates.
                self.advance_token();
            }
        }
        let eof = self.expect(TokenKind::Eof);
        CompilationUnit {
            members,
            span: start.merge(eof.span),
        }
    }

    // ── Members ──────────────────────────────────────────────────────

    fn member(&mut self) -> Member {
        let start = self.current().span;
        let annotations = self.annotations();
        let kind = match self.current().kind {
            TokenKind::Namespace => self.namespace_declaration(),
            TokenKind::Class => self.class_declaration(),
            TokenKind::Interface => self.interface_declaration(),
            TokenKind::Enum => self.enum_declaration(),
            // Methods are the only member that starts without a keyword
            // of its own, so everything else falls through to them.
            _ => MemberKind::Method(self.method_declaration()),
        };
        Member {
            annotations,
            kind,
            span: start.merge(self.previous_span()),
        }
    }

    fn annotations(&mut self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        while self.check(TokenKind::LBracket) {
            let open = self.advance_token();
            let name = self.expect(TokenKind::Identifier);
            let close = self.expect(TokenKind::RBracket);
            annotations.push(Annotation {
                name: name.text,
                span: open.span.merge(close.span),
            });
        }
        annotations
    }

    fn namespace_declaration(&mut self) -> MemberKind {
        self.expect(TokenKind::Namespace);
        let name = self.expect(TokenKind::Identifier);
        let members = self.member_body();
        MemberKind::Namespace {
            name: name.text,
            members,
        }
    }

    fn class_declaration(&mut self) -> MemberKind {
        self.expect(TokenKind::Class);
        let name = self.expect(TokenKind::Identifier);
        let type_params = self.type_parameter_list();
        let members = self.member_body();
        MemberKind::Class {
            name: name.text,
            type_params,
            members,
        }
    }

    fn interface_declaration(&mut self) -> MemberKind {
        self.expect(TokenKind::Interface);
        let name = self.expect(TokenKind::Identifier);
        let type_params = self.type_parameter_list();
        let members = self.member_body();
        MemberKind::Interface {
            name: name.text,
            type_params,
            members,
        }
    }

    fn enum_declaration(&mut self) -> MemberKind {
        self.expect(TokenKind::Enum);
        let name = self.expect(TokenKind::Identifier);
        self.expect(TokenKind::LBrace);
        let mut variants = Vec::new();
        while self.check(TokenKind::Identifier) {
            variants.push(self.advance_token().text);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace);
        MemberKind::Enum {
            name: name.text,
            variants,
        }
    }

    /// `{ member* }` shared by namespace, class, and interface bodies.
    /// Bodies nest to unbounded depth.
    fn member_body(&mut self) -> Vec<Member> {
        self.expect(TokenKind::LBrace);
        let mut members = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let before = self.position;
            members.push(self.member());
            if self.position == before {
                self.advance_token();
            }
        }
        self.expect(TokenKind::RBrace);
        members
    }

    /// `<T, U>` — empty when the next token is not `<`.
    fn type_parameter_list(&mut self) -> Vec<TypeParameter> {
        let mut params = Vec::new();
        if !self.match_token(TokenKind::Lt) {
            return params;
        }
        loop {
            let name = self.expect(TokenKind::Identifier);
            params.push(TypeParameter {
                name: name.text,
                span: name.span,
            });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt);
        params
    }

    fn method_declaration(&mut self) -> MethodDecl {
        let start = self.current().span;
        self.expect(TokenKind::Int);
        let name = self.expect(TokenKind::Identifier);
        self.expect(TokenKind::LParen);

        let mut params = Vec::new();
        while !self.check(TokenKind::RParen) && !self.check(TokenKind::Eof) {
            let ptype = self.expect(TokenKind::Int);
            let pname = self.expect(TokenKind::Identifier);
            params.push(Param {
                name: pname.text,
                span: ptype.span.merge(pname.span),
            });
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen);

        let body = self.block();
        let span = start.merge(body.span);
        MethodDecl {
            name: name.text,
            name_span: name.span,
            params,
            body,
            span,
        }
    }

    // ── Statements ───────────────────────────────────────────────────

    fn block(&mut self) -> Block {
        let open = self.expect(TokenKind::LBrace);
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let before = self.position;
            statements.push(self.statement());
            if self.position == before {
                self.advance_token();
            }
        }
        let close = self.expect(TokenKind::RBrace);
        Block {
            statements,
            span: open.span.merge(close.span),
        }
    }

    fn statement(&mut self) -> Stmt {
        // Return is the only statement; anything else is parsed as one
        // anyway and recovery inside `expect` reports the mismatch.
        self.return_statement()
    }

    fn return_statement(&mut self) -> Stmt {
        let keyword = self.expect(TokenKind::Return);
        let expression = self.expression(0);
        let semicolon = self.expect(TokenKind::Semicolon);
        let span = keyword.span.merge(semicolon.span);
        Stmt {
            kind: StmtKind::Return(expression),
            span,
        }
    }

    // ── Expressions ──────────────────────────────────────────────────

    /// Precedence-climbing loop. Left-associative: an operator at the same
    /// precedence as `parent_precedence` returns to the caller's loop
    /// instead of recursing, so chains of one operator parse iteratively.
    fn expression(&mut self, parent_precedence: u8) -> Expr {
        let mut left = self.primary();
        loop {
            let precedence = binary_precedence(self.current().kind);
            if precedence == 0 || precedence <= parent_precedence {
                break;
            }
            let operator = self.advance_token();
            let op = binary_operator(operator.kind)
                .expect("precedence table and operator table agree");
            let right = self.expression(precedence);
            let span = left.span.merge(right.span);
            left = Expr {
                kind: ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            };
        }
        left
    }

    fn primary(&mut self) -> Expr {
        match self.current().kind {
            TokenKind::LParen => self.parenthesized(),
            TokenKind::Identifier => {
                let token = self.advance_token();
                Expr {
                    kind: ExprKind::Name(token.text),
                    span: token.span,
                }
            }
            _ => {
                let token = self.expect(TokenKind::Number);
                Expr {
                    kind: ExprKind::Literal { value: token.value },
                    span: token.span,
                }
            }
        }
    }

    /// Parentheses group; they leave no node behind.
    fn parenthesized(&mut self) -> Expr {
        self.expect(TokenKind::LParen);
        let expression = self.expression(0);
        self.expect(TokenKind::RParen);
        expression
    }

    // ── Token-level helpers ──────────────────────────────────────────

    fn peek(&self, offset: usize) -> &Token {
        let index = self.position + offset;
        if index >= self.tokens.len() {
            self.tokens.last().expect("token stream ends in EOF")
        } else {
            &self.tokens[index]
        }
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn previous_span(&self) -> Span {
        if self.position == 0 {
            self.current().span
        } else {
            self.tokens[self.position - 1].span
        }
    }

    fn advance_token(&mut self) -> Token {
        let token = self.current().clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance_token();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it has the expected kind; otherwise
    /// report `UnexpectedToken` and synthesize a zero-length placeholder
    /// so parsing continues without consuming anything.
    fn expect(&mut self, kind: TokenKind) -> Token {
        if self.check(kind) {
            return self.advance_token();
        }
        let (found_kind, found_span) = {
            let found = self.current();
            (found.kind, found.span)
        };
        self.diagnostics.report(
            DiagnosticInfo::error(
                DiagnosticCategory::Syntax,
                DiagnosticCode::UnexpectedToken,
                format!("Expected '{}', found '{}'", kind, found_kind),
            ),
            Some(TextLocation::new("", found_span)),
        );
        Token::missing(kind, found_span.start)
    }
}

fn binary_precedence(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Plus | TokenKind::Minus => 1,
        TokenKind::Star | TokenKind::Slash => 2,
        _ => 0,
    }
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        _ => None,
    }
}
