//! Intermediate Representation (IR)
//!
//! A linear three-address code: each instruction has at most two source
//! operands and one destination. Control flow is expressed with labels and
//! jumps (`LABEL`, `GOTO`, `IF_FALSE`) rather than basic blocks, so every
//! optimizer analysis works on instruction positions.
//!
//! # Structure
//!
//! - `Instruction` - One three-address instruction
//! - `Opcode` - Operation tag, including the binary/unary operator sets
//! - `Operand` - Literal, name or label argument

pub mod instr;
pub mod operand;
pub mod pretty;

pub use instr::{BinaryOp, Instruction, Opcode, UnaryOp};
pub use operand::{format_number, Operand};
pub use pretty::{render_listing, PrettyPrint};
