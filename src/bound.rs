//! Bound tree — the syntax tree after semantic resolution.
//!
//! Every bound expression carries exactly one resolved type, an optional
//! folded constant value, and a nullability marker. The tree is built
//! once per bind, owned by that binding operation, and never contains an
//! unresolved name: the binder substitutes a zero literal (plus a
//! diagnostic) wherever resolution fails.

use crate::ast::BinaryOp;
use crate::symbols::{ParameterSymbol, TypeSymbol};
use std::fmt;

/// Discriminant of a bound node, reported to instrumentation observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundNodeKind {
    Block,
    Return,
    Literal,
    Binary,
    Parameter,
}

impl fmt::Display for BoundNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundNodeKind::Block => f.write_str("Block"),
            BoundNodeKind::Return => f.write_str("Return"),
            BoundNodeKind::Literal => f.write_str("Literal"),
            BoundNodeKind::Binary => f.write_str("Binary"),
            BoundNodeKind::Parameter => f.write_str("Parameter"),
        }
    }
}

/// Only these two states occur: literals and binary results are known
/// non-null, parameter references are unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NotNull,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct BoundBlock {
    pub statements: Vec<BoundStmt>,
}

#[derive(Debug, Clone)]
pub enum BoundStmt {
    Return(BoundExpr),
}

impl BoundStmt {
    pub fn kind(&self) -> BoundNodeKind {
        match self {
            BoundStmt::Return(_) => BoundNodeKind::Return,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoundExpr {
    pub kind: BoundExprKind,
    pub ty: TypeSymbol,
    /// Present when the expression folded to a compile-time constant.
    pub constant: Option<i64>,
    pub nullability: Nullability,
}

#[derive(Debug, Clone)]
pub enum BoundExprKind {
    Literal { value: i64 },
    Parameter(ParameterSymbol),
    Binary {
        left: Box<BoundExpr>,
        op: BinaryOp,
        right: Box<BoundExpr>,
    },
}

impl BoundExpr {
    pub fn literal(value: i64) -> Self {
        Self {
            kind: BoundExprKind::Literal { value },
            ty: TypeSymbol::int().clone(),
            constant: Some(value),
            nullability: Nullability::NotNull,
        }
    }

    pub fn parameter(symbol: ParameterSymbol) -> Self {
        let ty = symbol.ty.clone();
        Self {
            kind: BoundExprKind::Parameter(symbol),
            ty,
            constant: None,
            nullability: Nullability::Unknown,
        }
    }

    pub fn binary(left: BoundExpr, op: BinaryOp, right: BoundExpr) -> Self {
        Self {
            kind: BoundExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            ty: TypeSymbol::int().clone(),
            constant: None,
            nullability: Nullability::NotNull,
        }
    }

    pub fn kind(&self) -> BoundNodeKind {
        match &self.kind {
            BoundExprKind::Literal { .. } => BoundNodeKind::Literal,
            BoundExprKind::Parameter(_) => BoundNodeKind::Parameter,
            BoundExprKind::Binary { .. } => BoundNodeKind::Binary,
        }
    }
}

impl Drop for BoundExpr {
    // Unfolded operand chains can be tens of thousands of nodes deep;
    // teardown must not unwind the call stack node by node.
    fn drop(&mut self) {
        let placeholder = BoundExprKind::Literal { value: 0 };
        let mut stack = Vec::new();
        if let BoundExprKind::Binary { left, right, .. } =
            std::mem::replace(&mut self.kind, placeholder)
        {
            stack.push(left);
            stack.push(right);
        }
        while let Some(mut node) = stack.pop() {
            if let BoundExprKind::Binary { left, right, .. } =
                std::mem::replace(&mut node.kind, BoundExprKind::Literal { value: 0 })
            {
                stack.push(left);
                stack.push(right);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_folded_not_null() {
        let lit = BoundExpr::literal(5);
        assert_eq!(lit.constant, Some(5));
        assert_eq!(lit.nullability, Nullability::NotNull);
        assert_eq!(lit.ty, *TypeSymbol::int());
        assert_eq!(lit.kind(), BoundNodeKind::Literal);
    }

    #[test]
    fn test_parameter_is_unknown_nullability() {
        let sym = ParameterSymbol::new("a", TypeSymbol::int().clone(), 0);
        let expr = BoundExpr::parameter(sym);
        assert_eq!(expr.constant, None);
        assert_eq!(expr.nullability, Nullability::Unknown);
    }

    #[test]
    fn test_deep_chain_drops_without_overflow() {
        let mut expr = BoundExpr::literal(0);
        for _ in 0..100_000 {
            expr = BoundExpr::binary(expr, BinaryOp::Add, BoundExpr::literal(1));
        }
        drop(expr);
    }
}
