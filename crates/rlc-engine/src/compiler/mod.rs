//! rlc compiler - lowering to three-address IR and IR optimization.
//!
//! # Example
//!
//! ```ignore
//! use rlc_engine::compiler::{generate, render_listing, Optimizer};
//! use rlc_engine::parser::parse_source;
//!
//! let program = parse_source("x = 2; y = x + 3; print(y);")?;
//! let code = generate(&program);
//! let (optimized, log) = Optimizer::default().optimize(&code);
//! for line in render_listing(&optimized) {
//!     println!("{line}");
//! }
//! ```

pub mod ir;
pub mod lower;
pub mod optimize;

pub use ir::{render_listing, BinaryOp, Instruction, Opcode, Operand, PrettyPrint, UnaryOp};
pub use lower::{generate, Lowerer};
pub use optimize::{
    OptStats, OptimizationLogEntry, Optimizer, OptimizerConfig, Policy, Rewrite,
};
