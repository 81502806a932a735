//! Lexer for the rlc source language.
//!
//! This module implements the lexer on top of the logos library. It converts
//! source text into a stream of tokens with line/column information. Newlines
//! are emitted as tokens (the parser discards them at statement boundaries);
//! spaces, tabs, carriage returns and `//` comments are skipped.

use crate::parser::token::{Span, Token};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// This enum is used internally by logos for efficient tokenization.
/// It's converted to our main Token enum after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Whitespace other than newline (skip)
    #[regex(r"[ \t\r]+", logos::skip)]
    Whitespace,

    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("\n")]
    Newline,

    // Keywords (must come before identifiers)
    #[token("print")]
    Print,

    #[token("scan")]
    Scan,

    #[token("while")]
    While,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    // Literals. Digits with at most one decimal point; no sign, no exponent.
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,

    #[token("\"", lex_string)]
    String(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Two-character operators win over their one-character prefixes
    #[token("+=")]
    PlusEqual,

    #[token("-=")]
    MinusEqual,

    #[token("==")]
    EqualEqual,

    #[token("!=")]
    BangEqual,

    #[token(">=")]
    GreaterEqual,

    #[token("<=")]
    LessEqual,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("=")]
    Equal,

    #[token(">")]
    Greater,

    #[token("<")]
    Less,

    #[token("!")]
    Bang,

    // Delimiters
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(";")]
    Semicolon,
}

/// Scan a string body after the opening quote.
///
/// A backslash skips the following character without decoding it, so the
/// token value is the raw text between the quotes. Returns `None` (a lex
/// error) when the input ends before the closing quote.
fn lex_string(lex: &mut logos::Lexer<'_, LogosToken>) -> Option<String> {
    let remainder = lex.remainder();
    let mut chars = remainder.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => {
                let value = remainder[..i].to_string();
                lex.bump(i + 1);
                return Some(value);
            }
            _ => {}
        }
    }

    // Unterminated - consume to end so the error span covers the literal
    lex.bump(remainder.len());
    None
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<(Token, Span)>,
    line: u32,
    column: u32,
    cursor: usize,
}

/// Lexer error types.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    InvalidNumber { text: String, span: Span },
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            line: 1,
            column: 1,
            cursor: 0,
        }
    }

    /// Tokenize the whole source.
    ///
    /// The stream always ends with `Token::Eof`. The first lexical error
    /// aborts tokenization.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, LexError> {
        let mut logos_lexer = LogosToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            let range = logos_lexer.span();

            // Account for skipped whitespace and comments before this token
            self.advance_to(range.start);
            let span = Span::new(range.start, range.end, self.line, self.column);

            let token = match result {
                Ok(logos_token) => self.convert_token(logos_token, span)?,
                Err(()) => {
                    let slice = &self.source[range.clone()];
                    return Err(if slice.starts_with('"') {
                        LexError::UnterminatedString { span }
                    } else {
                        let char = slice.chars().next().unwrap_or('\0');
                        LexError::UnexpectedCharacter { char, span }
                    });
                }
            };

            self.tokens.push((token, span));
            self.advance_to(range.end);
        }

        self.advance_to(self.source.len());
        let eof_span = Span::new(self.source.len(), self.source.len(), self.line, self.column);
        self.tokens.push((Token::Eof, eof_span));

        Ok(self.tokens)
    }

    /// Move the line/column cursor forward to byte offset `target`.
    fn advance_to(&mut self, target: usize) {
        if target <= self.cursor {
            return;
        }
        for c in self.source[self.cursor..target].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.cursor = target;
    }

    fn convert_token(&self, logos_token: LogosToken, span: Span) -> Result<Token, LexError> {
        let token = match logos_token {
            LogosToken::Newline => Token::Newline,
            LogosToken::Print => Token::Print,
            LogosToken::Scan => Token::Scan,
            LogosToken::While => Token::While,
            LogosToken::If => Token::If,
            LogosToken::Else => Token::Else,
            LogosToken::Number => {
                let text = span.slice(self.source);
                let value = text.parse::<f64>().map_err(|_| LexError::InvalidNumber {
                    text: text.to_string(),
                    span,
                })?;
                Token::Number(value)
            }
            LogosToken::String(s) => Token::String(s),
            LogosToken::Identifier(name) => Token::Identifier(name),
            LogosToken::PlusEqual => Token::PlusEqual,
            LogosToken::MinusEqual => Token::MinusEqual,
            LogosToken::EqualEqual => Token::EqualEqual,
            LogosToken::BangEqual => Token::BangEqual,
            LogosToken::GreaterEqual => Token::GreaterEqual,
            LogosToken::LessEqual => Token::LessEqual,
            LogosToken::AmpAmp => Token::AmpAmp,
            LogosToken::PipePipe => Token::PipePipe,
            LogosToken::Plus => Token::Plus,
            LogosToken::Minus => Token::Minus,
            LogosToken::Star => Token::Star,
            LogosToken::Slash => Token::Slash,
            LogosToken::Equal => Token::Equal,
            LogosToken::Greater => Token::Greater,
            LogosToken::Less => Token::Less,
            LogosToken::Bang => Token::Bang,
            LogosToken::LeftParen => Token::LeftParen,
            LogosToken::RightParen => Token::RightParen,
            LogosToken::LeftBrace => Token::LeftBrace,
            LogosToken::RightBrace => Token::RightBrace,
            LogosToken::Semicolon => Token::Semicolon,
            LogosToken::Whitespace | LogosToken::LineComment => {
                unreachable!("Whitespace and comments should be skipped")
            }
        };
        Ok(token)
    }
}

/// Convenience wrapper around [`Lexer::tokenize`].
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, LexError> {
    Lexer::new(source).tokenize()
}

impl LexError {
    /// Get the span of this error
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::InvalidNumber { span, .. } => span,
        }
    }

    /// Line the error was found on
    pub fn line(&self) -> u32 {
        self.span().line
    }

    /// Get a description of this error
    pub fn description(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { char, .. } => {
                format!("Unknown character '{}'", char)
            }
            LexError::UnterminatedString { .. } => "Unterminated string".to_string(),
            LexError::InvalidNumber { text, .. } => {
                format!("Invalid number '{}'", text)
            }
        }
    }

    /// Get a hint for fixing this error
    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("Add a closing quote to terminate the string".to_string())
            }
            LexError::UnexpectedCharacter { char: '&', .. } => {
                Some("Logical and is written '&&'".to_string())
            }
            LexError::UnexpectedCharacter { char: '|', .. } => {
                Some("Logical or is written '||'".to_string())
            }
            _ => None,
        }
    }

    /// Format the error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        let span = self.span();
        let mut result = String::new();

        result.push_str(&format!(
            "Error at {}:{}: {}\n",
            span.line,
            span.column,
            self.description()
        ));

        if let Some(error_line) = source.lines().nth(span.line.saturating_sub(1) as usize) {
            result.push_str("    |\n");
            result.push_str(&format!("{:3} | {}\n", span.line, error_line));
            result.push_str(&format!(
                "    | {}^\n",
                " ".repeat(span.column.saturating_sub(1) as usize)
            ));
        }

        if let Some(hint) = self.hint() {
            result.push_str(&format!("\nHint: {}\n", hint));
        }

        result
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.description(),
            self.span().line,
            self.span().column
        )
    }
}

impl std::error::Error for LexError {}
