//! IL emitter — flattens a bound tree into stack-machine instructions.
//!
//! The mapping is total over the bound-node set except for binary
//! operators other than `+`: those are unsupported-construct failures,
//! fatal for the current compile because no recovery placeholder exists
//! for an unmodeled construct.
//!
//! Like the binder, the expression walk runs on an explicit stack so an
//! unfolded operand chain tens of thousands of nodes deep emits in
//! constant call-stack depth.

use crate::ast::BinaryOp;
use crate::bound::{BoundBlock, BoundExpr, BoundExprKind, BoundStmt};
use crate::errors::CompileError;
use crate::il::{IlBuilder, Instruction, Opcode};
use crate::instrument::Instrumentation;
use crate::symbols::MethodSymbol;

pub struct Emitter<'obs> {
    instrumentation: Option<&'obs dyn Instrumentation>,
}

impl<'obs> Emitter<'obs> {
    pub fn new() -> Self {
        Self {
            instrumentation: None,
        }
    }

    pub fn with_instrumentation(instrumentation: &'obs dyn Instrumentation) -> Self {
        Self {
            instrumentation: Some(instrumentation),
        }
    }

    /// Append the method body's instructions to `builder`, depth first,
    /// in evaluation order.
    pub fn emit_method(
        &self,
        _method: &MethodSymbol,
        body: &BoundBlock,
        builder: &mut IlBuilder,
    ) -> Result<(), CompileError> {
        for statement in &body.statements {
            self.emit_statement(statement, builder)?;
        }
        Ok(())
    }

    fn emit_statement(
        &self,
        statement: &BoundStmt,
        builder: &mut IlBuilder,
    ) -> Result<(), CompileError> {
        match statement {
            BoundStmt::Return(expression) => {
                self.emit_expression(expression, builder)?;
                self.emit(builder, Opcode::Ret, None);
                Ok(())
            }
        }
    }

    /// Iterative post-order emission: operands first, then the operation.
    fn emit_expression(
        &self,
        expression: &BoundExpr,
        builder: &mut IlBuilder,
    ) -> Result<(), CompileError> {
        enum Work<'a> {
            Expr(&'a BoundExpr),
            Combine(Opcode),
        }

        let mut work = vec![Work::Expr(expression)];
        while let Some(item) = work.pop() {
            match item {
                Work::Expr(e) => match &e.kind {
                    BoundExprKind::Literal { value } => {
                        self.emit(builder, Opcode::LdcI4, Some(*value));
                    }
                    BoundExprKind::Parameter(symbol) => {
                        self.emit(builder, Opcode::LdArg, Some(symbol.index as i64));
                    }
                    BoundExprKind::Binary { left, op, right } => {
                        if *op != BinaryOp::Add {
                            return Err(CompileError::UnsupportedOperator(*op));
                        }
                        work.push(Work::Combine(Opcode::Add));
                        work.push(Work::Expr(right));
                        work.push(Work::Expr(left));
                    }
                },
                Work::Combine(opcode) => {
                    self.emit(builder, opcode, None);
                }
            }
        }
        Ok(())
    }

    fn emit(&self, builder: &mut IlBuilder, opcode: Opcode, operand: Option<i64>) {
        builder.emit(opcode, operand);
        if let Some(instrumentation) = self.instrumentation {
            instrumentation.on_instruction_emitted(&Instruction::new(opcode, operand));
        }
    }
}

impl Default for Emitter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::MemberKind;
    use crate::binder::Binder;
    use crate::parser::SyntaxTree;

    fn emit(source: &str) -> Result<Vec<Instruction>, CompileError> {
        let tree = SyntaxTree::parse(source);
        assert!(
            tree.diagnostics.is_empty(),
            "Parse diagnostics: {:?}",
            tree.diagnostics
        );
        let mut binder = Binder::new();
        let MemberKind::Method(method) = &tree.root.members[0].kind else {
            panic!("Expected a method");
        };
        let (body, symbol) = binder.bind_method(method);
        let mut builder = IlBuilder::new();
        Emitter::new().emit_method(&symbol, &body, &mut builder)?;
        Ok(builder.into_instructions())
    }

    #[test]
    fn test_return_parameter_is_two_instructions() {
        let instructions = emit("int M(int a, int b) { return b; }").unwrap();
        assert_eq!(
            instructions,
            vec![
                Instruction::new(Opcode::LdArg, Some(1)),
                Instruction::new(Opcode::Ret, None),
            ]
        );
    }

    #[test]
    fn test_parameter_addition_is_four_instructions() {
        let instructions = emit("int Add(int a, int b) { return a + b; }").unwrap();
        assert_eq!(
            instructions,
            vec![
                Instruction::new(Opcode::LdArg, Some(0)),
                Instruction::new(Opcode::LdArg, Some(1)),
                Instruction::new(Opcode::Add, None),
                Instruction::new(Opcode::Ret, None),
            ]
        );
    }

    #[test]
    fn test_folded_constant_emits_single_push() {
        let instructions = emit("int M() { return 2 + 3; }").unwrap();
        assert_eq!(
            instructions,
            vec![
                Instruction::new(Opcode::LdcI4, Some(5)),
                Instruction::new(Opcode::Ret, None),
            ]
        );
    }

    #[test]
    fn test_mixed_operands_emit_in_evaluation_order() {
        let instructions = emit("int M(int a) { return a + 1 + 2; }").unwrap();
        assert_eq!(
            instructions,
            vec![
                Instruction::new(Opcode::LdArg, Some(0)),
                Instruction::new(Opcode::LdcI4, Some(1)),
                Instruction::new(Opcode::Add, None),
                Instruction::new(Opcode::LdcI4, Some(2)),
                Instruction::new(Opcode::Add, None),
                Instruction::new(Opcode::Ret, None),
            ]
        );
    }

    #[test]
    fn test_unsupported_operator_fails_naming_it() {
        let err = emit("int M(int a, int b) { return a * b; }").unwrap_err();
        assert_eq!(err, CompileError::UnsupportedOperator(BinaryOp::Mul));
        assert_eq!(err.to_string(), "operator '*' is not supported");
    }

    #[test]
    fn test_deep_unfolded_chain_emits_without_stack_growth() {
        let terms = vec!["a"; 10_000];
        let source = format!("int M(int a) {{ return {}; }}", terms.join("+"));
        let instructions = emit(&source).unwrap();
        // 10_000 loads, 9_999 adds, one ret.
        assert_eq!(instructions.len(), 20_000);
        assert_eq!(
            instructions.last(),
            Some(&Instruction::new(Opcode::Ret, None))
        );
    }

    #[test]
    fn test_instrumentation_sees_instructions_in_order() {
        use crate::instrument::test_support::RecordingInstrumentation;

        let tree = SyntaxTree::parse("int M() { return 1; }");
        let mut binder = Binder::new();
        let MemberKind::Method(method) = &tree.root.members[0].kind else {
            panic!("Expected a method");
        };
        let (body, symbol) = binder.bind_method(method);

        let recorder = RecordingInstrumentation::default();
        let emitter = Emitter::with_instrumentation(&recorder);
        let mut builder = IlBuilder::new();
        emitter.emit_method(&symbol, &body, &mut builder).unwrap();

        assert_eq!(*recorder.emitted.borrow(), builder.instructions());
    }
}
