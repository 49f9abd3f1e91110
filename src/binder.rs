//! Binder — resolves the syntax tree into a typed, constant-folded
//! bound tree plus a symbol table.
//!
//! Two entry points:
//!
//! - [`Binder::bind_compilation_unit`] walks the member tree depth-first,
//!   building a namespace-qualified dotted name at each nesting level and
//!   registering a [`TypeSymbol`] for every class, interface, and enum.
//!   Methods are not registered as types. The last registration for a
//!   given qualified name wins.
//!
//! - [`Binder::bind_method`] creates one [`ParameterSymbol`] per declared
//!   parameter (built-in `int`, sequential zero-based indices), installs
//!   them into the method scope, and binds the body.
//!
//! Binding never aborts: an unresolved name reports `UndefinedName` and
//! becomes a zero literal, so the bound tree never contains an unresolved
//! reference. Constant folding is addition-only: when both operands of a
//! `+` carry folded constants, the binary node is discarded and replaced
//! by a literal holding the sum. Other operators bind structurally.
//!
//! Binary chains are bound with an explicit work stack rather than
//! recursion, so a chain tens of thousands of nodes deep binds in
//! constant call-stack depth.

use crate::ast::{
    BinaryOp, Block, CompilationUnit, Expr, ExprKind, Member, MemberKind, MethodDecl, Stmt,
    StmtKind,
};
use crate::bound::{BoundBlock, BoundExpr, BoundNodeKind, BoundStmt};
use crate::diagnostics::{
    DiagnosticBag, DiagnosticCategory, DiagnosticCode, DiagnosticInfo, TextLocation,
};
use crate::instrument::Instrumentation;
use crate::symbols::{MethodSymbol, ParameterSymbol, TypeSymbol};
use crate::token::Span;
use std::collections::HashMap;

pub struct Binder<'obs> {
    scope: HashMap<String, ParameterSymbol>,
    types: HashMap<String, TypeSymbol>,
    diagnostics: DiagnosticBag,
    instrumentation: Option<&'obs dyn Instrumentation>,
}

impl<'obs> Binder<'obs> {
    pub fn new() -> Self {
        Self {
            scope: HashMap::new(),
            types: HashMap::new(),
            diagnostics: DiagnosticBag::new(),
            instrumentation: None,
        }
    }

    pub fn with_instrumentation(instrumentation: &'obs dyn Instrumentation) -> Self {
        Self {
            instrumentation: Some(instrumentation),
            ..Self::new()
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticBag {
        std::mem::take(&mut self.diagnostics)
    }

    /// The type registry built by [`bind_compilation_unit`], keyed by
    /// fully qualified dotted name.
    ///
    /// [`bind_compilation_unit`]: Binder::bind_compilation_unit
    pub fn types(&self) -> &HashMap<String, TypeSymbol> {
        &self.types
    }

    pub fn lookup_type(&self, qualified_name: &str) -> Option<&TypeSymbol> {
        self.types.get(qualified_name)
    }

    // ── Type registration ────────────────────────────────────────────

    pub fn bind_compilation_unit(&mut self, unit: &CompilationUnit) {
        for member in &unit.members {
            self.bind_member(member, None);
        }
    }

    fn bind_member(&mut self, member: &Member, namespace: Option<&str>) {
        match &member.kind {
            MemberKind::Namespace { name, members } => {
                let qualified = qualify(namespace, name);
                for m in members {
                    self.bind_member(m, Some(&qualified));
                }
            }
            MemberKind::Class {
                name,
                type_params,
                members,
            }
            | MemberKind::Interface {
                name,
                type_params,
                members,
            } => {
                let qualified = qualify(namespace, name);
                let params = type_params.iter().map(|p| p.name.clone()).collect();
                self.types
                    .insert(qualified.clone(), TypeSymbol::new(qualified.clone(), params));
                for m in members {
                    self.bind_member(m, Some(&qualified));
                }
            }
            MemberKind::Enum { name, .. } => {
                let qualified = qualify(namespace, name);
                self.types
                    .insert(qualified.clone(), TypeSymbol::new(qualified, Vec::new()));
            }
            MemberKind::Method(_) => {}
        }
    }

    // ── Method binding ───────────────────────────────────────────────

    pub fn bind_method(&mut self, syntax: &MethodDecl) -> (BoundBlock, MethodSymbol) {
        let mut parameters = Vec::new();
        for (index, param) in syntax.params.iter().enumerate() {
            let symbol = ParameterSymbol::new(&param.name, TypeSymbol::int().clone(), index);
            self.scope.insert(symbol.name.clone(), symbol.clone());
            parameters.push(symbol);
        }
        let symbol = MethodSymbol::new(&syntax.name, TypeSymbol::int().clone(), parameters);
        let body = self.bind_block(&syntax.body);
        (body, symbol)
    }

    fn bind_block(&mut self, syntax: &Block) -> BoundBlock {
        let mut statements = Vec::new();
        for statement in &syntax.statements {
            statements.push(self.bind_statement(statement));
        }
        self.notify(BoundNodeKind::Block);
        BoundBlock { statements }
    }

    fn bind_statement(&mut self, syntax: &Stmt) -> BoundStmt {
        match &syntax.kind {
            StmtKind::Return(expr) => {
                let expression = self.bind_expression(expr);
                self.notify(BoundNodeKind::Return);
                BoundStmt::Return(expression)
            }
        }
    }

    // ── Expression binding ───────────────────────────────────────────

    /// Iterative post-order bind over the expression tree. The explicit
    /// work stack is a hard requirement: operand chains reach tens of
    /// thousands of nodes and native recursion would exhaust the call
    /// stack.
    fn bind_expression(&mut self, expr: &Expr) -> BoundExpr {
        enum Work<'a> {
            Enter(&'a Expr),
            Exit(&'a Expr),
        }

        let mut work = vec![Work::Enter(expr)];
        let mut operands: Vec<BoundExpr> = Vec::new();

        while let Some(item) = work.pop() {
            match item {
                Work::Enter(e) => match &e.kind {
                    ExprKind::Literal { value } => {
                        operands.push(self.bind_literal(*value));
                    }
                    ExprKind::Name(name) => {
                        operands.push(self.bind_name(name, e.span));
                    }
                    ExprKind::Binary { left, right, .. } => {
                        work.push(Work::Exit(e));
                        work.push(Work::Enter(right));
                        work.push(Work::Enter(left));
                    }
                },
                Work::Exit(e) => {
                    let ExprKind::Binary { op, .. } = &e.kind else {
                        unreachable!("only binary nodes are re-visited");
                    };
                    let right = operands.pop().expect("operand stack holds right");
                    let left = operands.pop().expect("operand stack holds left");
                    operands.push(self.bind_binary(left, *op, right));
                }
            }
        }

        operands.pop().expect("operand stack holds the result")
    }

    fn bind_literal(&mut self, value: Option<i64>) -> BoundExpr {
        // Valueless tokens (synthesized or out of range) default to zero.
        let node = BoundExpr::literal(value.unwrap_or(0));
        self.notify(BoundNodeKind::Literal);
        node
    }

    fn bind_name(&mut self, name: &str, span: Span) -> BoundExpr {
        match self.scope.get(name) {
            Some(symbol) => {
                let node = BoundExpr::parameter(symbol.clone());
                self.notify(BoundNodeKind::Parameter);
                node
            }
            None => {
                self.diagnostics.report(
                    DiagnosticInfo::error(
                        DiagnosticCategory::Semantic,
                        DiagnosticCode::UndefinedName,
                        format!("Undefined name '{name}'"),
                    ),
                    Some(TextLocation::new("", span)),
                );
                // Substitute a zero literal so binding never aborts.
                let node = BoundExpr::literal(0);
                self.notify(BoundNodeKind::Literal);
                node
            }
        }
    }

    /// Addition over two folded constants collapses to a new literal; the
    /// binary node is discarded. Every other operator binds structurally.
    fn bind_binary(&mut self, left: BoundExpr, op: BinaryOp, right: BoundExpr) -> BoundExpr {
        if let (Some(l), Some(r)) = (left.constant, right.constant) {
            if op == BinaryOp::Add {
                let node = BoundExpr::literal(l.wrapping_add(r));
                self.notify(BoundNodeKind::Literal);
                return node;
            }
        }
        let node = BoundExpr::binary(left, op, right);
        self.notify(BoundNodeKind::Binary);
        node
    }

    fn notify(&self, kind: BoundNodeKind) {
        if let Some(instrumentation) = self.instrumentation {
            instrumentation.on_node_bound(kind);
        }
    }
}

impl Default for Binder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{ns}.{name}"),
        None => name.to_string(),
    }
}
