//! Optimization pass pipeline — ordered, named bound-tree stages.
//!
//! Each pass takes ownership of the bound block and returns the block to
//! feed into the next pass. The five conventional passes are identity
//! transforms: they establish the pipeline contract (fixed order, stable
//! names for tracing) and are the seam where real implementations slot
//! in. A pass must be idempotent on an already-optimized tree and must
//! never introduce an unresolved name.

use crate::bound::BoundBlock;

pub trait Pass {
    /// Stable name used in tracing output.
    fn name(&self) -> &'static str;

    fn run(&self, root: BoundBlock) -> BoundBlock;
}

pub struct SsaConstruction;

impl Pass for SsaConstruction {
    fn name(&self) -> &'static str {
        "ssa"
    }

    fn run(&self, root: BoundBlock) -> BoundBlock {
        root
    }
}

pub struct DeadCodeElimination;

impl Pass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "dce"
    }

    fn run(&self, root: BoundBlock) -> BoundBlock {
        root
    }
}

pub struct LoopInvariantCodeMotion;

impl Pass for LoopInvariantCodeMotion {
    fn name(&self) -> &'static str {
        "licm"
    }

    fn run(&self, root: BoundBlock) -> BoundBlock {
        root
    }
}

pub struct SparseConditionalConstantPropagation;

impl Pass for SparseConditionalConstantPropagation {
    fn name(&self) -> &'static str {
        "sccp"
    }

    fn run(&self, root: BoundBlock) -> BoundBlock {
        root
    }
}

pub struct GlobalValueNumbering;

impl Pass for GlobalValueNumbering {
    fn name(&self) -> &'static str {
        "gvn"
    }

    fn run(&self, root: BoundBlock) -> BoundBlock {
        root
    }
}

/// The fixed pass order: ssa, dce, licm, sccp, gvn.
pub fn default_passes() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(SsaConstruction),
        Box::new(DeadCodeElimination),
        Box::new(LoopInvariantCodeMotion),
        Box::new(SparseConditionalConstantPropagation),
        Box::new(GlobalValueNumbering),
    ]
}

/// Thread the block through every pass in order.
pub fn run_passes(passes: &[Box<dyn Pass>], root: BoundBlock) -> BoundBlock {
    let mut current = root;
    for pass in passes {
        tracing::debug!(pass = pass.name(), "running optimization pass");
        current = pass.run(current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::{BoundExpr, BoundStmt};

    #[test]
    fn test_fixed_order_and_names() {
        let names: Vec<_> = default_passes().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["ssa", "dce", "licm", "sccp", "gvn"]);
    }

    #[test]
    fn test_pipeline_preserves_statements() {
        let block = BoundBlock {
            statements: vec![BoundStmt::Return(BoundExpr::literal(7))],
        };
        let optimized = run_passes(&default_passes(), block);
        assert_eq!(optimized.statements.len(), 1);
        let BoundStmt::Return(expr) = &optimized.statements[0];
        assert_eq!(expr.constant, Some(7));
    }
}
