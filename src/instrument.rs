//! Instrumentation — an injected observer over binding and emission.
//!
//! The binder and emitter each hold an optional observer reference
//! supplied at construction and invoke it synchronously: once per bound
//! node and once per emitted instruction, in order. Observation is a
//! pure side effect with no feedback into the pipeline; "no observer" is
//! an explicit `None`, never a null.

use crate::bound::BoundNodeKind;
use crate::il::Instruction;

pub trait Instrumentation {
    fn on_node_bound(&self, kind: BoundNodeKind);
    fn on_instruction_emitted(&self, instruction: &Instruction);
}

/// Prints one line per event to stdout.
pub struct ConsoleInstrumentation;

impl Instrumentation for ConsoleInstrumentation {
    fn on_node_bound(&self, kind: BoundNodeKind) {
        println!("[bind] {kind}");
    }

    fn on_instruction_emitted(&self, instruction: &Instruction) {
        println!("[emit] {instruction}");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;

    /// Records every event for assertions.
    #[derive(Default)]
    pub struct RecordingInstrumentation {
        pub bound: RefCell<Vec<BoundNodeKind>>,
        pub emitted: RefCell<Vec<Instruction>>,
    }

    impl Instrumentation for RecordingInstrumentation {
        fn on_node_bound(&self, kind: BoundNodeKind) {
            self.bound.borrow_mut().push(kind);
        }

        fn on_instruction_emitted(&self, instruction: &Instruction) {
            self.emitted.borrow_mut().push(*instruction);
        }
    }
}
