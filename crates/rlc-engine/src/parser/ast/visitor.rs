//! AST visitor pattern for traversing the syntax tree
//!
//! Visitors walk the tree in pre-order, in program text order: a statement
//! is visited before its children, and for every binary form the left
//! operand is visited before the right one.
//!
//! # Example
//!
//! ```rust,ignore
//! use rlc_engine::parser::ast::*;
//!
//! struct CountIdentifiers {
//!     count: usize,
//! }
//!
//! impl Visitor for CountIdentifiers {
//!     fn visit_identifier(&mut self, _id: &Identifier) {
//!         self.count += 1;
//!     }
//! }
//! ```

use super::*;

/// AST visitor trait
///
/// Implement this trait to traverse the AST. Each visit method has a default
/// implementation that calls the corresponding walk function.
pub trait Visitor: Sized {
    // Top-level
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    // Statements
    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_assignment(&mut self, stmt: &AssignmentStatement) {
        walk_assignment(self, stmt);
    }

    fn visit_print(&mut self, stmt: &PrintStatement) {
        walk_print(self, stmt);
    }

    fn visit_scan(&mut self, _stmt: &ScanStatement) {
        // Leaf statement - no expressions to traverse
    }

    fn visit_while_statement(&mut self, stmt: &WhileStatement) {
        walk_while_statement(self, stmt);
    }

    fn visit_if_statement(&mut self, stmt: &IfStatement) {
        walk_if_statement(self, stmt);
    }

    // Expressions
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_binary_expression(&mut self, expr: &BinaryExpression) {
        walk_binary_expression(self, expr);
    }

    fn visit_unary_expression(&mut self, expr: &UnaryExpression) {
        walk_unary_expression(self, expr);
    }

    fn visit_number_literal(&mut self, _lit: &NumberLiteral) {}

    fn visit_string_literal(&mut self, _lit: &StringLiteral) {}

    fn visit_identifier(&mut self, _id: &Identifier) {
        // Leaf node - no traversal needed
    }
}

// ============================================================================
// Walk Functions - Default Traversal Implementations
// ============================================================================

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for stmt in &program.statements {
        visitor.visit_statement(stmt);
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Assignment(s) => visitor.visit_assignment(s),
        Statement::Print(s) => visitor.visit_print(s),
        Statement::Scan(s) => visitor.visit_scan(s),
        Statement::While(s) => visitor.visit_while_statement(s),
        Statement::If(s) => visitor.visit_if_statement(s),
    }
}

pub fn walk_assignment<V: Visitor>(visitor: &mut V, stmt: &AssignmentStatement) {
    visitor.visit_expression(&stmt.value);
}

pub fn walk_print<V: Visitor>(visitor: &mut V, stmt: &PrintStatement) {
    visitor.visit_expression(&stmt.expression);
}

pub fn walk_while_statement<V: Visitor>(visitor: &mut V, stmt: &WhileStatement) {
    visitor.visit_expression(&stmt.condition);
    for s in &stmt.body {
        visitor.visit_statement(s);
    }
}

pub fn walk_if_statement<V: Visitor>(visitor: &mut V, stmt: &IfStatement) {
    visitor.visit_expression(&stmt.condition);
    for s in &stmt.then_body {
        visitor.visit_statement(s);
    }
    if let Some(else_body) = &stmt.else_body {
        for s in else_body {
            visitor.visit_statement(s);
        }
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::NumberLiteral(lit) => visitor.visit_number_literal(lit),
        Expression::StringLiteral(lit) => visitor.visit_string_literal(lit),
        Expression::Identifier(id) => visitor.visit_identifier(id),
        Expression::Binary(e) => visitor.visit_binary_expression(e),
        Expression::Unary(e) => visitor.visit_unary_expression(e),
    }
}

pub fn walk_binary_expression<V: Visitor>(visitor: &mut V, expr: &BinaryExpression) {
    visitor.visit_expression(&expr.left);
    visitor.visit_expression(&expr.right);
}

pub fn walk_unary_expression<V: Visitor>(visitor: &mut V, expr: &UnaryExpression) {
    visitor.visit_expression(&expr.operand);
}
