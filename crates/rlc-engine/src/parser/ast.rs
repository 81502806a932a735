//! Abstract Syntax Tree (AST) for the rlc source language.
//!
//! This module defines the complete AST structure:
//! - Program structure
//! - Statements (assignment, print, scan, while, if)
//! - Expressions (literals, identifiers, unary and binary operations)
//!
//! The node set is closed: every consumer either implements [`Visitor`]
//! or matches exhaustively on [`Statement`] / [`Expression`]. Every node
//! carries a `Span` for diagnostics. The tree serializes to JSON with an
//! internal `"type"` tag per node; spans are not serialized.

use crate::parser::token::Span;
use serde::Serialize;

// Re-export submodules
pub mod expression;
pub mod statement;
pub mod visitor;

pub use expression::*;
pub use statement::*;
pub use visitor::*;

/// Root node: a whole source program.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Program")]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,

    /// Span covering the entire program
    #[serde(skip)]
    pub span: Span,
}

impl Program {
    /// Create a new program
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }

    /// Check if the program is empty
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Get the number of top-level statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }
}
