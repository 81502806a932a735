//! Token definitions for the rlc source language.
//!
//! This module defines all tokens that can appear in source programs:
//! literals, the five keywords, operators, delimiters and the two
//! control tokens (`Newline`, `Eof`).

use serde::Serialize;
use std::fmt;

/// A token in the rlc source language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Decimal number literal: 42, 3.14, 7.
    Number(f64),
    /// Double-quoted string literal (raw inner text, escapes passed through)
    String(String),
    /// Identifier
    Identifier(String),

    // Keywords
    Print,
    Scan,
    While,
    If,
    Else,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,

    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,

    // Comparison
    EqualEqual,
    BangEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,

    // Logical
    AmpAmp,
    PipePipe,
    Bang,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,

    // Special
    Newline,
    Eof,
}

/// Source location information for a token.
///
/// `start`/`end` are byte offsets; `line`/`column` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Print => write!(f, "print"),
            Token::Scan => write!(f, "scan"),
            Token::While => write!(f, "while"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Equal => write!(f, "="),
            Token::PlusEqual => write!(f, "+="),
            Token::MinusEqual => write!(f, "-="),
            Token::EqualEqual => write!(f, "=="),
            Token::BangEqual => write!(f, "!="),
            Token::Greater => write!(f, ">"),
            Token::Less => write!(f, "<"),
            Token::GreaterEqual => write!(f, ">="),
            Token::LessEqual => write!(f, "<="),
            Token::AmpAmp => write!(f, "&&"),
            Token::PipePipe => write!(f, "||"),
            Token::Bang => write!(f, "!"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Newline => write!(f, "newline"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

impl Token {
    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Token::Print | Token::Scan | Token::While | Token::If | Token::Else
        )
    }

    /// Returns true if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::String(_) | Token::Identifier(_)
        )
    }

    /// Upper-case kind name used in serialized token listings.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::Number(_) => "NUMBER",
            Token::String(_) => "STRING",
            Token::Identifier(_) => "IDENTIFIER",
            Token::Print => "PRINT",
            Token::Scan => "SCAN",
            Token::While => "WHILE",
            Token::If => "IF",
            Token::Else => "ELSE",
            Token::Plus => "PLUS",
            Token::Minus => "MINUS",
            Token::Star => "MULTIPLY",
            Token::Slash => "DIVIDE",
            Token::Equal => "ASSIGN",
            Token::PlusEqual => "PLUS_ASSIGN",
            Token::MinusEqual => "MINUS_ASSIGN",
            Token::EqualEqual => "EQUAL",
            Token::BangEqual => "NOT_EQUAL",
            Token::Greater => "GREATER",
            Token::Less => "LESS",
            Token::GreaterEqual => "GREATER_EQUAL",
            Token::LessEqual => "LESS_EQUAL",
            Token::AmpAmp => "AND",
            Token::PipePipe => "OR",
            Token::Bang => "NOT",
            Token::LeftParen => "LPAREN",
            Token::RightParen => "RPAREN",
            Token::LeftBrace => "LBRACE",
            Token::RightBrace => "RBRACE",
            Token::Semicolon => "SEMICOLON",
            Token::Newline => "NEWLINE",
            Token::Eof => "EOF",
        }
    }
}
