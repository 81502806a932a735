//! `rlc run` — compile a program and execute it.

use rlc_runtime::{Compiler, RuntimeOptions};
use std::path::PathBuf;

use super::read_source;
use crate::output::StyledOutput;

pub struct RunArgs {
    pub file: PathBuf,
    pub input: Option<PathBuf>,
    pub json: bool,
}

pub fn execute(out: &mut StyledOutput, args: RunArgs, options: RuntimeOptions) -> anyhow::Result<bool> {
    let source = read_source(&args.file)?;
    let input = match &args.input {
        Some(path) => read_source(path)?,
        None => String::new(),
    };

    let compiler = Compiler::new(options);
    let report = compiler.compile_and_execute(&source, &input);

    if args.json {
        out.line(&serde_json::to_string_pretty(&report)?);
        out.flush();
        return Ok(report.success);
    }

    out.plain(&report.output);
    out.flush();

    if !report.success {
        out.stderr_error("error");
        out.stderr_line(&format!(": {}", report.errors));
    }
    Ok(report.success)
}
