//! Syntax tree — typed nodes for the UIL grammar.
//!
//! Every node carries a [`Span`] for diagnostics. The tree is built once
//! per parse and never mutated afterward; container nodes hold their
//! children in declaration order.
//!
//! Node kinds are closed enums matched exhaustively, so adding a kind is
//! a compile-time obligation on every consumer (binder, printers, tests).

use crate::token::Span;
use std::fmt;

/// Root of a parse: zero or more members followed by EOF.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub members: Vec<Member>,
    pub span: Span,
}

// ── Members ──────────────────────────────────────────────────────────

/// A top-level or nested declaration, with any leading `[Annotation]`s.
#[derive(Debug, Clone)]
pub struct Member {
    pub annotations: Vec<Annotation>,
    pub kind: MemberKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum MemberKind {
    /// `namespace N { members }`
    Namespace { name: String, members: Vec<Member> },

    /// `class C<T, U> { members }`
    Class {
        name: String,
        type_params: Vec<TypeParameter>,
        members: Vec<Member>,
    },

    /// `interface I<T> { members }`
    Interface {
        name: String,
        type_params: Vec<TypeParameter>,
        members: Vec<Member>,
    },

    /// `enum E { A, B }`
    Enum { name: String, variants: Vec<String> },

    /// `int Name(int a, int b) { body }`
    Method(MethodDecl),
}

/// `[Name]` attached to a member.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub name: String,
    pub span: Span,
}

/// A generic type parameter name in a `<...>` list.
#[derive(Debug, Clone)]
pub struct TypeParameter {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub name_span: Span,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// A method parameter: `int name`.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub span: Span,
}

// ── Statements ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `return expr;`
    Return(Expr),
}

// ── Expressions ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal: `42`. The value is absent when the token was
    /// synthesized or out of range; binding substitutes zero.
    Literal { value: Option<i64> },

    /// Name reference: `x`
    Name(String),

    /// Binary operation: `a + b`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
}

impl Drop for Expr {
    // Operand chains can be tens of thousands of nodes deep; teardown
    // must not unwind the call stack node by node.
    fn drop(&mut self) {
        let placeholder = ExprKind::Literal { value: None };
        let mut stack = Vec::new();
        if let ExprKind::Binary { left, right, .. } =
            std::mem::replace(&mut self.kind, placeholder)
        {
            stack.push(left);
            stack.push(right);
        }
        while let Some(mut node) = stack.pop() {
            if let ExprKind::Binary { left, right, .. } =
                std::mem::replace(&mut node.kind, ExprKind::Literal { value: None })
            {
                stack.push(left);
                stack.push(right);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => f.write_str("+"),
            BinaryOp::Sub => f.write_str("-"),
            BinaryOp::Mul => f.write_str("*"),
            BinaryOp::Div => f.write_str("/"),
        }
    }
}
