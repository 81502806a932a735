//! rlc Language Engine
//!
//! This crate provides the compiler core for the rlc teaching language:
//! - **Parser**: Lexer, parser, and semantic checker (`parser` module)
//! - **Compiler**: Three-address IR, lowering, and optimization (`compiler` module)
//!
//! Nothing here performs I/O; code generation for a host interpreter and
//! execution live in `rlc-runtime`.
//!
//! # Example
//!
//! ```rust,ignore
//! use rlc_engine::{analyze_program, generate, parse_source, Optimizer};
//!
//! let program = parse_source("x = 2;\nprint(x * 3);\n")?;
//! assert!(analyze_program(&program).is_empty());
//!
//! let code = generate(&program);
//! let (optimized, log) = Optimizer::default().optimize(&code);
//! ```

#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Parser module: Lexer, parser, AST, and semantic checker
pub mod parser;

/// Compiler module: IR, lowering, and optimizations
pub mod compiler;

// ============================================================================
// Re-exports from Parser
// ============================================================================

pub use parser::{
    // Lexer
    tokenize, Diagnostic, LexError, Lexer, Span, Token,
    // Parser
    parse_source, ParseError, ParseErrorKind, Parser,
    // Checker
    analyze_program, SemanticAnalyzer, SemanticError, SymbolTable,
    // AST
    ast, Program,
};

// ============================================================================
// Re-exports from Compiler
// ============================================================================

pub use compiler::{
    // IR
    ir, render_listing, Instruction, Opcode, Operand,
    // Lowering
    generate, Lowerer,
    // Optimizer
    OptStats, OptimizationLogEntry, Optimizer, OptimizerConfig, Policy, Rewrite,
};
