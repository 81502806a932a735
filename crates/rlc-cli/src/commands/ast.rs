//! `rlc ast` — print the syntax tree as JSON.

use std::path::Path;

use super::{parse, read_source};
use crate::output::StyledOutput;

pub fn execute(out: &mut StyledOutput, file: &Path) -> anyhow::Result<bool> {
    let source = read_source(file)?;
    let Some(program) = parse(out, file, &source) else {
        return Ok(false);
    };

    out.line(&serde_json::to_string_pretty(&program)?);
    out.flush();
    Ok(true)
}
