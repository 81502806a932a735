//! `rlc tokens` — print the token stream.

use rlc_engine::Token;
use std::path::Path;

use super::{lex, read_source};
use crate::output::StyledOutput;

pub fn execute(out: &mut StyledOutput, file: &Path) -> anyhow::Result<bool> {
    let source = read_source(file)?;
    let Some(tokens) = lex(out, file, &source) else {
        return Ok(false);
    };

    for (token, span) in &tokens {
        out.dim(&format!("{:>4}:{:<4} ", span.line, span.column));
        out.info(&format!("{:<14}", token.kind_name()));
        match token {
            Token::Newline | Token::Eof => {}
            _ => out.plain(&format!(" {}", span.slice(&source))),
        }
        out.newline();
    }
    out.flush();
    Ok(true)
}
