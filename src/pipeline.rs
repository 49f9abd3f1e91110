//! End-to-end compilation driver.
//!
//! Runs the whole pipeline over one source text:
//!
//! ```text
//! Source → Lex → Parse → Bind → Optimize ×5 → Emit → Instructions
//! ```
//!
//! Diagnostics accumulate across stages and never stop the driver; only
//! an unsupported construct (no recovery placeholder) aborts with an
//! error. Callers inspect [`Compilation::diagnostics`] to decide whether
//! the output is trustworthy.

use crate::ast::{Member, MemberKind, MethodDecl};
use crate::binder::Binder;
use crate::diagnostics::DiagnosticBag;
use crate::emitter::Emitter;
use crate::errors::CompileError;
use crate::il::{IlBuilder, Instruction};
use crate::instrument::Instrumentation;
use crate::parser::SyntaxTree;
use crate::passes::{default_passes, run_passes};
use crate::symbols::MethodSymbol;

/// The result of compiling one source text end to end.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub method: MethodSymbol,
    pub instructions: Vec<Instruction>,
    /// Parse and bind diagnostics, in stage order.
    pub diagnostics: DiagnosticBag,
}

impl Compilation {
    /// Textual IL: one lowercase mnemonic (plus operand) per line.
    pub fn il(&self) -> String {
        let mut builder = IlBuilder::new();
        for instruction in &self.instructions {
            builder.emit(instruction.opcode, instruction.operand);
        }
        builder.to_string()
    }
}

pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    compile_with(source, None)
}

pub fn compile_with(
    source: &str,
    instrumentation: Option<&dyn Instrumentation>,
) -> Result<Compilation, CompileError> {
    let tree = SyntaxTree::parse(source);
    let mut diagnostics = tree.diagnostics.clone();

    let mut binder = match instrumentation {
        Some(observer) => Binder::with_instrumentation(observer),
        None => Binder::new(),
    };
    binder.bind_compilation_unit(&tree.root);

    let method_syntax = find_method(&tree.root.members).ok_or(CompileError::MissingMethod)?;
    let (body, method) = binder.bind_method(method_syntax);
    diagnostics.extend(binder.take_diagnostics());

    tracing::debug!(method = %method, "bound method, running passes");
    let optimized = run_passes(&default_passes(), body);

    let emitter = match instrumentation {
        Some(observer) => Emitter::with_instrumentation(observer),
        None => Emitter::new(),
    };
    let mut builder = IlBuilder::new();
    emitter.emit_method(&method, &optimized, &mut builder)?;

    Ok(Compilation {
        method,
        instructions: builder.into_instructions(),
        diagnostics,
    })
}

/// First method declaration in the member tree, depth first.
fn find_method(members: &[Member]) -> Option<&MethodDecl> {
    for member in members {
        match &member.kind {
            MemberKind::Method(method) => return Some(method),
            MemberKind::Namespace { members, .. }
            | MemberKind::Class { members, .. }
            | MemberKind::Interface { members, .. } => {
                if let Some(found) = find_method(members) {
                    return Some(found);
                }
            }
            MemberKind::Enum { .. } => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use crate::il::Opcode;

    #[test]
    fn test_complete_compilation_emits_expected_il() {
        let compilation = compile("int Add(int a, int b) { return a + b; }").unwrap();
        assert!(compilation.diagnostics.is_empty());
        assert_eq!(compilation.method.name, "Add");
        assert_eq!(
            compilation.instructions,
            vec![
                Instruction::new(Opcode::LdArg, Some(0)),
                Instruction::new(Opcode::LdArg, Some(1)),
                Instruction::new(Opcode::Add, None),
                Instruction::new(Opcode::Ret, None),
            ]
        );
        assert_eq!(compilation.il(), "ldarg 0\nldarg 1\nadd\nret\n");
    }

    #[test]
    fn test_pass_pipeline_is_idempotent() {
        let source = "int Add(int a, int b) { return a + b; }";
        let tree = SyntaxTree::parse(source);
        let mut binder = Binder::new();
        let method_syntax = find_method(&tree.root.members).unwrap();
        let (body, method) = binder.bind_method(method_syntax);

        let once = run_passes(&default_passes(), body);
        let twice = run_passes(&default_passes(), once.clone());

        let render = |block| {
            let mut builder = IlBuilder::new();
            Emitter::new().emit_method(&method, &block, &mut builder).unwrap();
            builder.to_string()
        };
        assert_eq!(render(once), render(twice));
    }

    #[test]
    fn test_method_found_inside_nested_members() {
        let compilation =
            compile("namespace N { class C { int M() { return 1; } } }").unwrap();
        assert_eq!(compilation.method.name, "M");
        assert_eq!(compilation.il(), "ldci4 1\nret\n");
    }

    #[test]
    fn test_no_method_is_an_error() {
        let err = compile("namespace N { }").unwrap_err();
        assert_eq!(err, CompileError::MissingMethod);
    }

    #[test]
    fn test_diagnostics_do_not_stop_the_driver() {
        let compilation = compile("int M() { return x; }").unwrap();
        assert_eq!(compilation.diagnostics.len(), 1);
        assert_eq!(
            compilation.diagnostics.iter().next().unwrap().info.code,
            DiagnosticCode::UndefinedName
        );
        // The substituted zero literal still emits.
        assert_eq!(compilation.il(), "ldci4 0\nret\n");
    }
}
