//! uilc — compiler front end for the UIL single-method language.
//!
//! # Pipeline
//!
//! ```text
//! Source Code (.uil)
//!     │
//!     ▼
//! ┌──────────┐
//! │  Lexer    │  Tokenizes source into a stream of tokens with spans
//! └────┬─────┘
//!      │
//!      ▼
//! ┌──────────┐
//! │  Parser   │  Recursive descent + precedence climbing; never aborts
//! └────┬─────┘
//!      │
//!      ▼
//! ┌──────────┐
//! │  Binder   │  Symbols, type registry, constant folding
//! └────┬─────┘
//!      │
//!      ▼
//! ┌──────────┐
//! │  Passes   │  Fixed-order bound-tree pipeline (ssa → … → gvn)
//! └────┬─────┘
//!      │
//!      ▼
//! ┌──────────┐
//! │  Emitter  │  Bound tree → stack-machine IL
//! └────┬─────┘
//!      │
//!      ▼
//! Instruction sequence
//! ```
//!
//! Each stage is a total function over the previous stage's artifact;
//! recoverable anomalies accumulate in per-stage diagnostic bags and the
//! caller decides whether to proceed past them. The pipeline is
//! synchronous and single-threaded; concurrent compilations each get
//! their own instances and share nothing mutable.

pub mod ast;
pub mod binder;
pub mod bound;
pub mod diagnostics;
pub mod emitter;
pub mod errors;
pub mod il;
pub mod instrument;
pub mod lexer;
pub mod parser;
pub mod passes;
pub mod pipeline;
pub mod symbols;
pub mod token;

pub use errors::CompileError;
pub use pipeline::{compile, compile_with, Compilation};
