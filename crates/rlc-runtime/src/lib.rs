//! rlc Runtime
//!
//! Drives the engine end to end: compiles a source program, renders it for
//! a host interpreter and runs it in a time-limited child process.
//!
//! # Example
//!
//! ```rust,ignore
//! use rlc_runtime::{Compiler, RuntimeOptions};
//!
//! let compiler = Compiler::new(RuntimeOptions::default());
//! let report = compiler.compile_and_execute("scan(n);\nprint(n * 2);\n", "21");
//! assert_eq!(report.output, "42\n");
//! ```

#![warn(rust_2018_idioms)]

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod executor;
pub mod options;

pub use codegen::{CodeGenerator, PythonGenerator};
pub use compiler::{
    Compilation, CompilationReport, Compiler, TokenRecord, EMPTY_SOURCE_MESSAGE,
    INTERNAL_ERROR_MESSAGE,
};
pub use error::RuntimeError;
pub use executor::{split_input, Execution, Executor, ProcessExecutor, TIMEOUT_MESSAGE};
pub use options::{RuntimeOptions, CONFIG_FILE_NAME};
