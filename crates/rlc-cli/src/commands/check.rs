//! `rlc check` — lex, parse and analyze without running.

use rlc_engine::SemanticAnalyzer;
use std::path::Path;

use super::{parse, read_source, report_diagnostic};
use crate::output::StyledOutput;

pub fn execute(out: &mut StyledOutput, file: &Path) -> anyhow::Result<bool> {
    let source = read_source(file)?;
    let Some(program) = parse(out, file, &source) else {
        return Ok(false);
    };

    let errors = SemanticAnalyzer::new().analyze(&program);
    for err in &errors {
        report_diagnostic(out, file, err.span(), &err.to_string());
    }

    if errors.is_empty() {
        out.success("ok");
        out.line(&format!(
            ": {} ({} statements)",
            file.display(),
            program.len()
        ));
        Ok(true)
    } else {
        out.error(&format!("{} error(s)", errors.len()));
        out.newline();
        Ok(false)
    }
}
