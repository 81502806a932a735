//! Parse error types and error reporting

use crate::parser::token::{Span, Token};
use std::fmt;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: Vec<Token>, found: Token },

    /// Unexpected end of input
    UnexpectedEof { expected: Vec<Token> },

    /// Invalid syntax
    InvalidSyntax { reason: String },

    /// Parser exceeded its nesting depth limit
    ParserLimitExceeded { message: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.span.line, self.span.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

fn describe(expected: &[Token]) -> String {
    expected
        .iter()
        .map(|tok| format!("'{}'", tok))
        .collect::<Vec<_>>()
        .join(" or ")
}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = if expected.is_empty() {
            format!("Unexpected token {}", found.kind_name())
        } else {
            format!(
                "Expected {}, found {}",
                describe(&expected),
                found.kind_name()
            )
        };

        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = if expected.is_empty() {
            "Unexpected end of input".to_string()
        } else {
            format!("Unexpected end of input, expected {}", describe(&expected))
        };

        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            message: reason.clone(),
            kind: ParseErrorKind::InvalidSyntax { reason },
            span,
        }
    }

    /// Create a "parser limit exceeded" error.
    pub fn parser_limit_exceeded(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self {
            kind: ParseErrorKind::ParserLimitExceeded {
                message: message.clone(),
            },
            span,
            message,
        }
    }

    /// Line the error was found on
    pub fn line(&self) -> u32 {
        self.span.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let err = ParseError::unexpected_token(
            vec![Token::Semicolon],
            Token::RightBrace,
            Span::new(10, 11, 3, 4),
        );
        assert_eq!(err.message, "Expected ';', found RBRACE");
        assert_eq!(err.line(), 3);
        assert_eq!(
            err.to_string(),
            "Parse error at line 3, column 4: Expected ';', found RBRACE"
        );
    }

    #[test]
    fn test_unexpected_eof_message() {
        let err = ParseError::unexpected_eof(vec![Token::RightParen], Span::new(5, 5, 1, 6));
        assert!(err.message.contains("end of input"));
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));
    }
}
