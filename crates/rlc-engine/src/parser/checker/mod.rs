//! Semantic checking
//!
//! This module provides the symbol table and the semantic analyzer that runs
//! between parsing and IR lowering.

pub mod analyzer;
pub mod error;
pub mod symbols;

pub use analyzer::{analyze_program, SemanticAnalyzer};
pub use error::SemanticError;
pub use symbols::{Scope, ScopeId, SymbolTable};
