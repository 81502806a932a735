//! Error types for semantic checking
//!
//! The display text of each variant is the diagnostic surfaced to users.

use crate::parser::Span;
use thiserror::Error;

/// Errors found by the semantic analyzer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SemanticError {
    /// Variable read before any assignment or scan defines it
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        /// Variable name
        name: String,
        /// Location of the reference
        span: Span,
    },

    /// Division whose right operand is the literal zero
    #[error("Division by zero")]
    DivisionByZero {
        /// Location of the division
        span: Span,
    },
}

impl SemanticError {
    /// Get the span of this error
    pub fn span(&self) -> &Span {
        match self {
            SemanticError::UndefinedVariable { span, .. }
            | SemanticError::DivisionByZero { span } => span,
        }
    }
}
