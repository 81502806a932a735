//! `rlc emit` — print the generated Python program.

use rlc_engine::analyze_program;
use rlc_runtime::{CodeGenerator, PythonGenerator};
use std::path::Path;

use super::{parse, read_source};
use crate::output::StyledOutput;

pub fn execute(out: &mut StyledOutput, file: &Path) -> anyhow::Result<bool> {
    let source = read_source(file)?;
    let Some(program) = parse(out, file, &source) else {
        return Ok(false);
    };

    // Only checked programs are rendered.
    let diagnostics = analyze_program(&program);
    if !diagnostics.is_empty() {
        for message in diagnostics {
            out.stderr_error("error");
            out.stderr_line(&format!(": {}", message));
        }
        return Ok(false);
    }

    out.plain(&PythonGenerator::new().generate(&program));
    out.flush();
    Ok(true)
}
