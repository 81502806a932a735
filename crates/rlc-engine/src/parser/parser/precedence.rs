//! Operator precedence table for expression parsing.
//!
//! Levels run from loosest (`||`) to tightest (primary). Every binary level
//! is left-associative.

use crate::parser::ast::BinaryOperator;
use crate::parser::token::Token;

/// Operator precedence level (higher = tighter binding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    LogicalOr = 1,      // ||
    LogicalAnd = 2,     // &&
    Equality = 3,       // ==, !=
    Relational = 4,     // <, >, <=, >=
    Additive = 5,       // +, -
    Multiplicative = 6, // *, /
    Unary = 7,          // !, -
}

impl Precedence {
    /// The next tighter level.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative | Precedence::Unary => Precedence::Unary,
        }
    }
}

/// Get the binary operator and precedence of a token, if it is one.
pub fn binary_operator(token: &Token) -> Option<(BinaryOperator, Precedence)> {
    let entry = match token {
        Token::PipePipe => (BinaryOperator::Or, Precedence::LogicalOr),
        Token::AmpAmp => (BinaryOperator::And, Precedence::LogicalAnd),
        Token::EqualEqual => (BinaryOperator::Equal, Precedence::Equality),
        Token::BangEqual => (BinaryOperator::NotEqual, Precedence::Equality),
        Token::Greater => (BinaryOperator::GreaterThan, Precedence::Relational),
        Token::Less => (BinaryOperator::LessThan, Precedence::Relational),
        Token::GreaterEqual => (BinaryOperator::GreaterEqual, Precedence::Relational),
        Token::LessEqual => (BinaryOperator::LessEqual, Precedence::Relational),
        Token::Plus => (BinaryOperator::Add, Precedence::Additive),
        Token::Minus => (BinaryOperator::Subtract, Precedence::Additive),
        Token::Star => (BinaryOperator::Multiply, Precedence::Multiplicative),
        Token::Slash => (BinaryOperator::Divide, Precedence::Multiplicative),
        _ => return None,
    };
    Some(entry)
}
