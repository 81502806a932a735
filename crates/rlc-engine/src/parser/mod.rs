//! rlc parser - lexer, parser and semantic checker for the rlc source
//! language.
//!
//! # Example
//!
//! ```ignore
//! use rlc_engine::parser::{Lexer, Parser};
//!
//! let source = "x = 2;\nprint(x * 3);\n";
//!
//! match Lexer::new(source).tokenize() {
//!     Ok(tokens) => {
//!         for (token, span) in &tokens {
//!             println!("{:?} at {}:{}", token, span.line, span.column);
//!         }
//!         let program = Parser::from_tokens(tokens).parse();
//!     }
//!     Err(err) => eprintln!("{}", err.format_with_source(source)),
//! }
//! ```

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod checker;
pub mod diagnostic;

// Re-exports for convenience
pub use token::{Span, Token};
pub use lexer::{tokenize, LexError, Lexer};
pub use parser::{parse_source, ParseError, ParseErrorKind, Parser};
pub use ast::Program;
pub use checker::{analyze_program, SemanticAnalyzer, SemanticError, SymbolTable};
pub use diagnostic::Diagnostic;
