//! Serializable shape of a fatal front-end error.

use serde::Serialize;

use super::lexer::LexError;
use super::parser::ParseError;

/// `{message, line}` record for a lexer or parser error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: u32,
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        Self {
            message: err.description(),
            line: err.line(),
        }
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Self {
            message: err.message.clone(),
            line: err.line(),
        }
    }
}
