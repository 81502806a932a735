//! rlc command-line tool
//!
//! Compiles programs in the rlc teaching language, shows every
//! intermediate stage (tokens, AST, IR, optimized IR, generated Python)
//! and runs the result in a sandboxed interpreter.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "rlc")]
#[command(about = "Compiler for the rlc teaching language", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./rlc.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// When to use colors
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn as_str(self) -> &'static str {
        match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run a program
    Run {
        /// Source file
        file: PathBuf,
        /// File whose lines feed scan() in order
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Execution time limit in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Skip the IR optimizer
        #[arg(long)]
        no_optimize: bool,
        /// Seed for the optimizer's exploration RNG
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full compilation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Lex, parse and analyze without running
    Check {
        /// Source file
        file: PathBuf,
    },

    /// Show the IR before and after optimization
    Ir {
        /// Source file
        file: PathBuf,
        /// Skip the IR optimizer
        #[arg(long)]
        no_optimize: bool,
    },

    /// Show the token stream
    Tokens {
        /// Source file
        file: PathBuf,
    },

    /// Show the syntax tree as JSON
    Ast {
        /// Source file
        file: PathBuf,
    },

    /// Print the generated Python program
    Emit {
        /// Source file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    commands::logging::init(cli.verbose, cli.log_format == LogFormat::Json);

    let mut out = output::StyledOutput::new(output::resolve_color_choice(Some(cli.color.as_str())));

    match dispatch(cli, &mut out) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            out.stderr_error("error");
            eprintln!(": {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Returns `Ok(false)` when the command ran but the program failed.
fn dispatch(cli: Cli, out: &mut output::StyledOutput) -> anyhow::Result<bool> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            file,
            input,
            timeout_ms,
            no_optimize,
            seed,
            json,
        } => {
            let mut options = commands::load_options(config)?;
            if let Some(ms) = timeout_ms {
                options.timeout_ms = ms;
            }
            if no_optimize {
                options.optimize = false;
            }
            if seed.is_some() {
                options.optimizer.seed = seed;
            }
            options.validate()?;

            commands::run::execute(
                out,
                commands::run::RunArgs {
                    file,
                    input,
                    json,
                },
                options,
            )
        }

        Commands::Check { file } => commands::check::execute(out, &file),

        Commands::Ir { file, no_optimize } => {
            let mut options = commands::load_options(config)?;
            if no_optimize {
                options.optimize = false;
            }
            commands::ir::execute(out, &file, options)
        }

        Commands::Tokens { file } => commands::tokens::execute(out, &file),

        Commands::Ast { file } => commands::ast::execute(out, &file),

        Commands::Emit { file } => commands::emit::execute(out, &file),
    }
}
