//! `rlc ir` — show intermediate code before and after optimization.

use rlc_engine::ir::PrettyPrint;
use rlc_runtime::{Compiler, RuntimeError, RuntimeOptions};
use std::path::Path;

use super::read_source;
use crate::output::StyledOutput;

pub fn execute(out: &mut StyledOutput, file: &Path, options: RuntimeOptions) -> anyhow::Result<bool> {
    let source = read_source(file)?;
    let compiler = Compiler::new(options);

    let compilation = match compiler.compile_only(&source) {
        Ok(compilation) => compilation,
        Err(RuntimeError::Semantic(diagnostics)) => {
            for message in diagnostics {
                out.stderr_error("error");
                out.stderr_line(&format!(": {}", message));
            }
            return Ok(false);
        }
        Err(err) => {
            out.stderr_error("error");
            out.stderr_line(&format!(": {}", err));
            return Ok(false);
        }
    };

    out.heading(&format!("Intermediate code ({} instructions)", compilation.intermediate.len()));
    out.plain(&compilation.intermediate.as_slice().pretty_print());
    out.newline();

    out.heading(&format!("Optimized code ({} instructions)", compilation.optimized.len()));
    out.plain(&compilation.optimized.as_slice().pretty_print());

    if !compilation.log.is_empty() {
        out.newline();
        out.heading("Optimization log");
        for line in compilation.log_lines() {
            out.dim("  ");
            out.info(&line);
            out.newline();
        }
    }
    out.flush();
    Ok(true)
}
