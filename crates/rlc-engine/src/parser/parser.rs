//! Parser for the rlc source language
//!
//! This module implements a single-shot recursive descent parser that
//! transforms the token stream from the lexer into a [`Program`]. The first
//! structural violation aborts parsing; there is no error recovery.

pub mod error;
pub mod expr;
pub mod guards;
pub mod precedence;
pub mod stmt;

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer};
use crate::parser::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// Parser state.
pub struct Parser {
    /// Pre-tokenized input
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Current nesting depth (statements, unary chains, parentheses)
    pub(crate) depth: usize,
}

impl Parser {
    /// Create a parser over an already lexed token stream.
    ///
    /// A trailing `Eof` is appended if the stream lacks one.
    pub fn from_tokens(mut tokens: Vec<(Token, Span)>) -> Self {
        if !matches!(tokens.last(), Some((Token::Eof, _))) {
            let eof_span = match tokens.last() {
                Some((_, last)) => Span::new(last.end, last.end, last.line, last.column),
                None => Span::new(0, 0, 1, 1),
            };
            tokens.push((Token::Eof, eof_span));
        }

        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Create a new parser from source code.
    pub fn new(source: &str) -> Result<Self, LexError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    /// Parse the entire token stream into a Program AST.
    pub fn parse(mut self) -> Result<Program, ParseError> {
        let start_span = self.current_span();
        let mut statements = Vec::new();

        self.skip_newlines();
        while !self.at_eof() {
            statements.push(stmt::parse_statement(&mut self)?);
            self.skip_newlines();
        }

        let span = match statements.last() {
            Some(last) => self.combine_spans(&start_span, last.span()),
            None => start_span,
        };

        Ok(Program::new(statements, span))
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(tok, _)| tok)
    }

    /// Token `offset` positions ahead of the current one.
    #[inline]
    pub fn nth(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(tok, _)| tok)
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume an identifier and return its name.
    pub fn expect_identifier(&mut self) -> Result<(String, Span), ParseError> {
        let span = self.current_span();
        match self.current().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected_token(&[Token::Identifier(String::new())])),
        }
    }

    /// Skip any newline tokens. Newlines carry no meaning between statements.
    pub fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Combine two spans into one covering both.
    pub fn combine_spans(&self, start: &Span, end: &Span) -> Span {
        start.to(end)
    }
}

/// Parse source text into a Program.
///
/// Lexer failures are reported as a [`ParseError`] carrying the lexer's
/// message and line so callers see a single diagnostic type.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let parser = Parser::new(source).map_err(|err| {
        ParseError::invalid_syntax(err.to_string(), *err.span())
    })?;
    parser.parse()
}
