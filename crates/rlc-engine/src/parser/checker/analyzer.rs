//! Semantic analyzer
//!
//! Walks the program in source order over a single flat symbol table.
//! Assignment and scan targets define names (definitions simply upsert);
//! every identifier read before a definition is reported, as is every
//! division whose right operand is the literal zero.

use super::error::SemanticError;
use super::symbols::SymbolTable;
use crate::parser::ast::*;

/// Semantic analyzer
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    errors: Vec<SemanticError>,
}

impl SemanticAnalyzer {
    /// Create a new analyzer
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            errors: Vec::new(),
        }
    }

    /// Analyze a program, returning diagnostics in source order.
    ///
    /// An empty result means the program may proceed to lowering. Each call
    /// starts from an empty symbol table.
    pub fn analyze(&mut self, program: &Program) -> Vec<SemanticError> {
        self.symbols = SymbolTable::new();
        self.errors.clear();
        self.visit_program(program);
        std::mem::take(&mut self.errors)
    }

    /// Symbol table left by the most recent analysis
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for SemanticAnalyzer {
    fn visit_assignment(&mut self, stmt: &AssignmentStatement) {
        // The value is checked before the target becomes defined, so
        // `x = x + 1;` on a fresh `x` is an error. Compound targets are
        // not treated as reads.
        walk_assignment(self, stmt);
        self.symbols.define(&stmt.target, stmt.span);
    }

    fn visit_scan(&mut self, stmt: &ScanStatement) {
        self.symbols.define(&stmt.target, stmt.span);
    }

    fn visit_binary_expression(&mut self, expr: &BinaryExpression) {
        walk_binary_expression(self, expr);

        if expr.operator == BinaryOperator::Divide && expr.right.is_zero_literal() {
            self.errors.push(SemanticError::DivisionByZero { span: expr.span });
        }
    }

    fn visit_identifier(&mut self, id: &Identifier) {
        if !self.symbols.is_defined(&id.name) {
            self.errors.push(SemanticError::UndefinedVariable {
                name: id.name.clone(),
                span: id.span,
            });
        }
    }
}

/// Analyze a program and render its diagnostics as text.
pub fn analyze_program(program: &Program) -> Vec<String> {
    SemanticAnalyzer::new()
        .analyze(program)
        .iter()
        .map(ToString::to_string)
        .collect()
}
