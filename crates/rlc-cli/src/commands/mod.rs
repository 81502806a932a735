//! Subcommand implementations.
//!
//! Each command returns `Ok(false)` when the input program is rejected or
//! fails at run time, and `Err` only for problems with the invocation itself
//! (unreadable files, bad configuration).

pub mod ast;
pub mod check;
pub mod emit;
pub mod ir;
pub mod logging;
pub mod run;
pub mod tokens;

use anyhow::Context;
use rlc_engine::{Parser, Program, Span, Token};
use rlc_runtime::{RuntimeOptions, CONFIG_FILE_NAME};
use std::path::Path;

use crate::output::StyledOutput;

/// Read a source file.
pub fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Explicit `--config` file, else `./rlc.toml` when present, else defaults.
pub fn load_options(config: Option<&Path>) -> anyhow::Result<RuntimeOptions> {
    match config {
        Some(path) => RuntimeOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let local = Path::new(CONFIG_FILE_NAME);
            if local.is_file() {
                RuntimeOptions::load(local)
                    .with_context(|| format!("failed to load config {}", local.display()))
            } else {
                Ok(RuntimeOptions::default())
            }
        }
    }
}

/// Print `file:line:column: message` to stderr.
pub fn report_diagnostic(out: &mut StyledOutput, path: &Path, span: &Span, message: &str) {
    out.stderr_error("error");
    out.stderr_line(&format!(
        ": {}:{}:{}: {}",
        path.display(),
        span.line,
        span.column,
        message
    ));
}

/// Lex a file, reporting a lexical error to stderr.
pub fn lex(
    out: &mut StyledOutput,
    path: &Path,
    source: &str,
) -> Option<Vec<(Token, Span)>> {
    match rlc_engine::tokenize(source) {
        Ok(tokens) => Some(tokens),
        Err(err) => {
            out.stderr_error("error");
            out.stderr_line(&format!(": {}", path.display()));
            out.stderr_line(err.format_with_source(source).trim_end());
            None
        }
    }
}

/// Lex and parse a file, reporting the first error to stderr.
pub fn parse(out: &mut StyledOutput, path: &Path, source: &str) -> Option<Program> {
    let tokens = lex(out, path, source)?;
    match Parser::from_tokens(tokens).parse() {
        Ok(program) => Some(program),
        Err(err) => {
            report_diagnostic(out, path, &err.span, &err.message);
            None
        }
    }
}
