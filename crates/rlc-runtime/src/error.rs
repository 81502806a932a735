//! Runtime error types.

use rlc_engine::{Diagnostic, LexError, ParseError};

/// Errors that can occur while loading configuration or compiling a program.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Lexer error
    #[error("{0}")]
    Lex(#[from] LexError),

    /// Parse error
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// One or more semantic diagnostics, in discovery order
    #[error("{}", .0.join("\n"))]
    Semantic(Vec<String>),

    /// AST could not be rendered as JSON
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid or unreadable configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for RuntimeError {
    fn from(err: toml::de::Error) -> Self {
        RuntimeError::Config(err.to_string())
    }
}

impl RuntimeError {
    /// Source line the error points at, when it comes from the front end.
    pub fn line(&self) -> Option<u32> {
        match self {
            RuntimeError::Lex(e) => Some(e.line()),
            RuntimeError::Parse(e) => Some(e.line()),
            _ => None,
        }
    }

    /// `{message, line}` form of a lexer or parser error.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        match self {
            RuntimeError::Lex(e) => Some(Diagnostic::from(e)),
            RuntimeError::Parse(e) => Some(Diagnostic::from(e)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_errors_join_with_newlines() {
        let err = RuntimeError::Semantic(vec![
            "Undefined variable 'x'".to_string(),
            "Division by zero".to_string(),
        ]);
        assert_eq!(err.to_string(), "Undefined variable 'x'\nDivision by zero");
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_lex_error_keeps_line() {
        let err: RuntimeError = rlc_engine::tokenize("x = \"open")
            .expect_err("unterminated string")
            .into();
        assert_eq!(err.line(), Some(1));
        assert!(err.to_string().starts_with("Unterminated string"));
        let diag = err.diagnostic().unwrap();
        assert_eq!((diag.message.as_str(), diag.line), ("Unterminated string", 1));
    }

    #[test]
    fn test_toml_error_becomes_config() {
        let toml_err = toml::from_str::<toml::Value>("timeout_ms = ").unwrap_err();
        match RuntimeError::from(toml_err) {
            RuntimeError::Config(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Config, got {:?}", other),
        }
    }
}
