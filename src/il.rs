//! IL instruction model — the flat, stack-based output form.
//!
//! Instructions are appended once, in emission order, into a single
//! owned [`IlBuilder`]; nothing is ever patched or removed. The textual
//! rendering is one lowercase mnemonic per line, followed by the integer
//! operand when one is present.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Push an integer constant.
    LdcI4,
    /// Load an argument by zero-based index.
    LdArg,
    /// Pop two values, push their sum.
    Add,
    /// Return the value on top of the stack.
    Ret,
}

impl Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::LdcI4 => "ldci4",
            Opcode::LdArg => "ldarg",
            Opcode::Add => "add",
            Opcode::Ret => "ret",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Option<i64>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operand: Option<i64>) -> Self {
        Self { opcode, operand }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            None => write!(f, "{}", self.opcode),
            Some(operand) => write!(f, "{} {}", self.opcode, operand),
        }
    }
}

/// Append-only instruction list for one method.
#[derive(Debug, Clone, Default)]
pub struct IlBuilder {
    instructions: Vec<Instruction>,
}

impl IlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its index.
    pub fn emit(&mut self, opcode: Opcode, operand: Option<i64>) -> usize {
        self.instructions.push(Instruction::new(opcode, operand));
        self.instructions.len() - 1
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl fmt::Display for IlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_returns_sequential_indices() {
        let mut builder = IlBuilder::new();
        assert_eq!(builder.emit(Opcode::LdcI4, Some(1)), 0);
        assert_eq!(builder.emit(Opcode::Ret, None), 1);
        assert_eq!(builder.instructions().len(), 2);
    }

    #[test]
    fn test_textual_rendering() {
        let mut builder = IlBuilder::new();
        builder.emit(Opcode::LdArg, Some(0));
        builder.emit(Opcode::LdcI4, Some(5));
        builder.emit(Opcode::Add, None);
        builder.emit(Opcode::Ret, None);
        assert_eq!(builder.to_string(), "ldarg 0\nldci4 5\nadd\nret\n");
    }
}
