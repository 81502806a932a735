//! Compilation pipeline.
//!
//! Lex → Parse → Analyze → Lower → Optimize → Generate → Execute.
//!
//! Every stage's artifact is recorded in a [`CompilationReport`], so a
//! caller can inspect how far a program got even when a later stage fails.

use rlc_engine::{
    analyze_program, generate, render_listing, tokenize, Diagnostic, OptimizationLogEntry,
    Optimizer, Parser, Program, Span, Token,
};
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span};

use crate::codegen::{CodeGenerator, PythonGenerator};
use crate::error::RuntimeError;
use crate::executor::{split_input, Execution, Executor, ProcessExecutor};
use crate::options::RuntimeOptions;

/// Diagnostic for blank source text.
pub const EMPTY_SOURCE_MESSAGE: &str = "No source code provided";

/// Diagnostic for a fault that escaped every stage.
pub const INTERNAL_ERROR_MESSAGE: &str = "Compilation Error: internal error";

/// One lexed token as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRecord {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: String,
    pub line: u32,
    pub column: u32,
}

impl TokenRecord {
    /// `value` is the lexeme, except for strings (inner text) and end of
    /// input (empty).
    pub fn new(source: &str, token: &Token, span: &Span) -> Self {
        let value = match token {
            Token::String(text) => text.clone(),
            Token::Eof => String::new(),
            _ => span.slice(source).to_string(),
        };
        Self {
            kind: token.kind_name(),
            value,
            line: span.line,
            column: span.column,
        }
    }
}

/// Result record of one compile-and-run request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompilationReport {
    pub tokens: Vec<TokenRecord>,
    pub ast: Option<serde_json::Value>,
    pub semantic_errors: Vec<String>,
    pub intermediate_code: Vec<String>,
    pub optimized_code: Vec<String>,
    pub optimization_log: Vec<String>,
    pub generated_code: String,
    pub output: String,
    pub errors: String,
    /// Structured form of a lexer or parser failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
    pub success: bool,
    /// Wall-clock seconds for the whole request
    pub execution_time: f64,
}

/// Front end and optimizer artifacts, without generation or execution.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<TokenRecord>,
    pub program: Program,
    pub intermediate: Vec<rlc_engine::Instruction>,
    pub optimized: Vec<rlc_engine::Instruction>,
    pub log: Vec<OptimizationLogEntry>,
}

impl Compilation {
    pub fn intermediate_listing(&self) -> Vec<String> {
        render_listing(&self.intermediate)
    }

    pub fn optimized_listing(&self) -> Vec<String> {
        render_listing(&self.optimized)
    }

    pub fn log_lines(&self) -> Vec<String> {
        self.log.iter().map(ToString::to_string).collect()
    }
}

/// Compiler orchestrating the engine and the two external collaborators.
///
/// The optimizer is long-lived and shared, so one `Compiler` (or several
/// holding the same `Arc<Optimizer>`) can serve concurrent requests.
pub struct Compiler {
    options: RuntimeOptions,
    optimizer: Arc<Optimizer>,
    generator: Box<dyn CodeGenerator>,
    executor: Box<dyn Executor>,
}

impl Compiler {
    /// Compiler targeting Python through a child interpreter process
    pub fn new(options: RuntimeOptions) -> Self {
        let optimizer = Arc::new(Optimizer::new(options.optimizer.clone()));
        let executor = Box::new(ProcessExecutor::from_options(&options));
        Self::with_parts(options, optimizer, Box::new(PythonGenerator::new()), executor)
    }

    pub fn with_parts(
        options: RuntimeOptions,
        optimizer: Arc<Optimizer>,
        generator: Box<dyn CodeGenerator>,
        executor: Box<dyn Executor>,
    ) -> Self {
        Self {
            options,
            optimizer,
            generator,
            executor,
        }
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    pub fn optimizer(&self) -> &Arc<Optimizer> {
        &self.optimizer
    }

    pub fn generator(&self) -> &dyn CodeGenerator {
        self.generator.as_ref()
    }

    /// Run the front end and the optimizer.
    ///
    /// Semantic diagnostics are returned as [`RuntimeError::Semantic`].
    pub fn compile_only(&self, source: &str) -> Result<Compilation, RuntimeError> {
        let tokens = tokenize(source)?;
        let records = token_records(source, &tokens);

        let program = Parser::from_tokens(tokens).parse()?;

        let diagnostics = analyze_program(&program);
        if !diagnostics.is_empty() {
            return Err(RuntimeError::Semantic(diagnostics));
        }

        let intermediate = generate(&program);
        let (optimized, log) = if self.options.optimize {
            self.optimizer.optimize(&intermediate)
        } else {
            (intermediate.clone(), Vec::new())
        };

        Ok(Compilation {
            tokens: records,
            program,
            intermediate,
            optimized,
            log,
        })
    }

    /// Run the whole pipeline and report every stage.
    ///
    /// Never fails: errors land in the report's `errors` field with
    /// `success = false`. A panic in any stage or collaborator is caught
    /// here and reported as [`INTERNAL_ERROR_MESSAGE`].
    pub fn compile_and_execute(&self, source: &str, input: &str) -> CompilationReport {
        let span = info_span!("compile", bytes = source.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut report = CompilationReport::default();
        if source.trim().is_empty() {
            report.errors = EMPTY_SOURCE_MESSAGE.to_string();
        } else {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.run(source, input, &mut report)
            }));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    report.success = false;
                    report.diagnostic = err.diagnostic();
                    report.errors = match err {
                        RuntimeError::Semantic(diagnostics) => diagnostics.join("\n"),
                        other => format!("Compilation Error: {}", other),
                    };
                }
                Err(_) => {
                    error!("compilation pipeline panicked");
                    report.success = false;
                    report.errors = INTERNAL_ERROR_MESSAGE.to_string();
                }
            }
        }

        report.execution_time = start.elapsed().as_secs_f64();
        info!(
            success = report.success,
            seconds = report.execution_time,
            "compilation finished"
        );
        report
    }

    fn run(
        &self,
        source: &str,
        input: &str,
        report: &mut CompilationReport,
    ) -> Result<(), RuntimeError> {
        let tokens = tokenize(source)?;
        report.tokens = token_records(source, &tokens);
        info!(tokens = report.tokens.len(), "lexed");

        let program = Parser::from_tokens(tokens).parse()?;
        report.ast = Some(serde_json::to_value(&program)?);
        info!(statements = program.len(), "parsed");

        let diagnostics = analyze_program(&program);
        if !diagnostics.is_empty() {
            info!(diagnostics = diagnostics.len(), "semantic analysis failed");
            report.semantic_errors = diagnostics.clone();
            return Err(RuntimeError::Semantic(diagnostics));
        }

        let intermediate = generate(&program);
        report.intermediate_code = render_listing(&intermediate);

        let (optimized, log) = if self.options.optimize {
            self.optimizer.optimize(&intermediate)
        } else {
            (intermediate, Vec::new())
        };
        report.optimized_code = render_listing(&optimized);
        report.optimization_log = log.iter().map(ToString::to_string).collect();

        report.generated_code = self.generator.generate(&program);
        info!(
            language = self.generator.language(),
            bytes = report.generated_code.len(),
            "generated"
        );

        let Execution {
            output,
            errors,
            success,
        } = self
            .executor
            .execute(&report.generated_code, &split_input(input));
        report.output = output;
        report.errors = errors;
        report.success = success;
        Ok(())
    }
}

fn token_records(source: &str, tokens: &[(Token, Span)]) -> Vec<TokenRecord> {
    tokens
        .iter()
        .map(|(token, span)| TokenRecord::new(source, token, span))
        .collect()
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(RuntimeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes its input lines instead of spawning a process.
    struct EchoExecutor;

    impl Executor for EchoExecutor {
        fn execute(&self, _program: &str, input: &[String]) -> Execution {
            Execution {
                output: input.join(","),
                errors: String::new(),
                success: true,
            }
        }
    }

    struct PanickingGenerator;

    impl CodeGenerator for PanickingGenerator {
        fn language(&self) -> &'static str {
            "none"
        }

        fn generate(&self, _program: &Program) -> String {
            panic!("generator failure");
        }
    }

    fn compiler() -> Compiler {
        Compiler::with_parts(
            RuntimeOptions::default(),
            Arc::new(Optimizer::default()),
            Box::new(PythonGenerator::new()),
            Box::new(EchoExecutor),
        )
    }

    #[test]
    fn test_empty_source() {
        let report = compiler().compile_and_execute("  \n\t", "");
        assert!(!report.success);
        assert_eq!(report.errors, "No source code provided");
        assert!(report.tokens.is_empty());
    }

    #[test]
    fn test_successful_run_fills_every_stage() {
        let report = compiler().compile_and_execute("scan(x);\nprint(x + 1);\n", " 4\n5 \n");
        assert!(report.success, "errors: {}", report.errors);
        assert_eq!(report.output, "4,5");
        assert_eq!(report.tokens.first().map(|t| t.kind), Some("SCAN"));
        assert_eq!(report.tokens.last().map(|t| t.kind), Some("EOF"));
        assert!(report.ast.is_some());
        assert!(report.semantic_errors.is_empty());
        assert_eq!(report.intermediate_code.len(), 3);
        assert!(!report.optimized_code.is_empty());
        assert!(report.generated_code.contains("v_x = _scan()"));
        assert!(report.execution_time >= 0.0);
    }

    #[test]
    fn test_semantic_errors_stop_before_lowering() {
        let report = compiler().compile_and_execute("print(y);\nz = 1 / 0;\n", "");
        assert!(!report.success);
        assert_eq!(
            report.semantic_errors,
            vec!["Undefined variable 'y'", "Division by zero"]
        );
        assert_eq!(report.errors, "Undefined variable 'y'\nDivision by zero");
        assert!(report.ast.is_some());
        assert!(report.intermediate_code.is_empty());
        assert!(report.generated_code.is_empty());
    }

    #[test]
    fn test_front_end_errors_are_prefixed() {
        let report = compiler().compile_and_execute("x = \"open;\n", "");
        assert!(!report.success);
        assert!(
            report.errors.starts_with("Compilation Error: Unterminated string"),
            "got: {}",
            report.errors
        );

        assert_eq!(report.diagnostic.as_ref().map(|d| d.line), Some(1));

        let report = compiler().compile_and_execute("x = ;", "");
        assert!(report.errors.starts_with("Compilation Error: Parse error at line 1"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["diagnostic"]["line"], 1);
        assert!(!report.tokens.is_empty());
        assert!(report.ast.is_none());
    }

    #[test]
    fn test_generator_panic_becomes_internal_error() {
        let compiler = Compiler::with_parts(
            RuntimeOptions::default(),
            Arc::new(Optimizer::default()),
            Box::new(PanickingGenerator),
            Box::new(EchoExecutor),
        );
        let report = compiler.compile_and_execute("x = 1;\nprint(x);\n", "");
        assert!(!report.success);
        assert_eq!(report.errors, INTERNAL_ERROR_MESSAGE);
        assert!(report.generated_code.is_empty());
        assert!(!report.intermediate_code.is_empty());

        // The shared optimizer stays usable after the panic.
        let report = compiler.compile_and_execute("print(1);", "");
        assert_eq!(report.errors, INTERNAL_ERROR_MESSAGE);
        assert!(!report.optimized_code.is_empty());
    }

    #[test]
    fn test_overlong_operator_chain_is_reported() {
        let chain = vec!["1"; 2000].join(" + ");
        let source = format!("x = {};\nprint(x);\n", chain);
        let report = compiler().compile_and_execute(&source, "");
        assert!(!report.success);
        assert!(
            report.errors.starts_with("Compilation Error: Parse error at line 1"),
            "got: {}",
            report.errors
        );
        assert!(report.errors.contains("too deeply nested"));
        assert!(report.ast.is_none());

        let chain = vec!["1"; 200].join(" + ");
        let report = compiler().compile_and_execute(&format!("print({});", chain), "");
        assert!(report.success, "errors: {}", report.errors);
    }

    #[test]
    fn test_token_records() {
        let report = compiler().compile_and_execute("s = \"hi\";\nprint(s);", "");
        let first: Vec<(&str, &str)> = report
            .tokens
            .iter()
            .take(5)
            .map(|t| (t.kind, t.value.as_str()))
            .collect();
        assert_eq!(
            first,
            vec![
                ("IDENTIFIER", "s"),
                ("ASSIGN", "="),
                ("STRING", "hi"),
                ("SEMICOLON", ";"),
                ("NEWLINE", "\n"),
            ]
        );
        let print = &report.tokens[5];
        assert_eq!((print.kind, print.line, print.column), ("PRINT", 2, 1));
    }

    #[test]
    fn test_compile_only() {
        let compiler = compiler();
        let compilation = compiler
            .compile_only("x = 2; y = x + 3; print(y);")
            .unwrap();
        assert_eq!(compilation.intermediate.len(), 4);
        assert!(compilation.optimized_listing().iter().any(|l| l.contains("y = 5")));
        assert!(compilation
            .log_lines()
            .iter()
            .all(|l| l.starts_with("Applied ")));

        match compiler.compile_only("print(q);") {
            Err(RuntimeError::Semantic(diags)) => {
                assert_eq!(diags, vec!["Undefined variable 'q'"])
            }
            other => panic!("Expected Semantic error, got {:?}", other.map(|c| c.tokens)),
        }
    }

    #[test]
    fn test_optimize_disabled_copies_ir() {
        let options = RuntimeOptions {
            optimize: false,
            ..RuntimeOptions::default()
        };
        let compiler = Compiler::with_parts(
            options,
            Arc::new(Optimizer::default()),
            Box::new(PythonGenerator::new()),
            Box::new(EchoExecutor),
        );
        let report = compiler.compile_and_execute("x = 2; y = x + 3; print(y);", "");
        assert_eq!(report.intermediate_code, report.optimized_code);
        assert!(report.optimization_log.is_empty());
    }

    #[test]
    fn test_report_serializes_with_wire_names() {
        let report = compiler().compile_and_execute("print(1);", "");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tokens"][0]["type"], "PRINT");
        assert_eq!(json["ast"]["type"], "Program");
        for key in [
            "semantic_errors",
            "intermediate_code",
            "optimized_code",
            "optimization_log",
            "generated_code",
            "output",
            "errors",
            "success",
            "execution_time",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
