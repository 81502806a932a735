//! Sandboxed execution of generated programs.
//!
//! The generated program is written to a temporary file and run by a
//! child interpreter process with piped stdio. Reader threads drain stdout
//! and stderr into channels while the caller polls the child against the
//! configured deadline and kills it when the deadline fires.

use crossbeam::channel::{self, Receiver};
use serde::Serialize;
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::options::RuntimeOptions;

/// Diagnostic returned when the program exceeds its time limit.
pub const TIMEOUT_MESSAGE: &str = "Execution timed out";

/// Outcome of running one generated program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Execution {
    /// Captured standard output
    pub output: String,
    /// Diagnostics (empty on success)
    pub errors: String,
    pub success: bool,
}

impl Execution {
    pub fn timed_out() -> Self {
        Self {
            output: String::new(),
            errors: TIMEOUT_MESSAGE.to_string(),
            success: false,
        }
    }

    fn failed(errors: String) -> Self {
        Self {
            output: String::new(),
            errors,
            success: false,
        }
    }

    fn from_output(output: Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            Self {
                output: stdout,
                errors: String::new(),
                success: true,
            }
        } else {
            let detail = match stderr.trim_end() {
                "" => format!("process exited with {}", output.status),
                text => text.to_string(),
            };
            Self {
                output: stdout,
                errors: format!("Runtime Error: {}", detail),
                success: false,
            }
        }
    }
}

/// Runs generated program text against a list of input lines.
pub trait Executor: Send + Sync {
    fn execute(&self, program: &str, input: &[String]) -> Execution;
}

/// Split raw input text into scan lines: surrounding whitespace is trimmed,
/// then the text is split on newlines. Blank input yields no lines.
pub fn split_input(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Interval between exit checks while a program runs.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Executor that writes the program to a temporary file and spawns
/// `<interpreter> <args…> <file>` as a child process.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    interpreter: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessExecutor {
    pub fn new(interpreter: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            interpreter: interpreter.into(),
            args,
            timeout,
        }
    }

    pub fn from_options(options: &RuntimeOptions) -> Self {
        Self::new(
            options.interpreter.clone(),
            options.interpreter_args.clone(),
            options.timeout(),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn write_program(&self, program: &str) -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("rlc-")
            .suffix(".py")
            .tempfile()?;
        file.write_all(program.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    /// Poll the child until it exits or the deadline fires.
    ///
    /// Returns `None` after killing a program that ran out of time.
    fn wait(&self, child: &mut Child) -> io::Result<Option<ExitStatus>> {
        let deadline = channel::after(self.timeout);
        let ticker = channel::tick(POLL_INTERVAL);
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            crossbeam::channel::select! {
                recv(deadline) -> _ => {
                    warn!(
                        pid = child.id(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "program timed out, killing"
                    );
                    // The handle still owns the unreaped child, so the
                    // signal cannot reach a recycled pid.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                },
                recv(ticker) -> _ => {},
            }
        }
    }
}

fn collect(pipe: Option<impl Read + Send + 'static>) -> Receiver<Vec<u8>> {
    let (tx, rx) = channel::bounded(1);
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    }
    rx
}

impl Executor for ProcessExecutor {
    fn execute(&self, program: &str, input: &[String]) -> Execution {
        let script = match self.write_program(program) {
            Ok(file) => file,
            Err(e) => {
                return Execution::failed(format!(
                    "Execution Error: failed to write program: {}",
                    e
                ))
            }
        };

        let mut child = match Command::new(&self.interpreter)
            .args(&self.args)
            .arg(script.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return Execution::failed(format!(
                    "Execution Error: failed to start '{}': {}",
                    self.interpreter, e
                ))
            }
        };
        debug!(pid = child.id(), interpreter = %self.interpreter, lines = input.len(), "spawned program");

        // A program that never reads stdin closes the pipe early; the
        // resulting write error is irrelevant.
        if let Some(mut stdin) = child.stdin.take() {
            let mut payload = input.join("\n");
            if !payload.is_empty() {
                payload.push('\n');
            }
            thread::spawn(move || {
                let _ = stdin.write_all(payload.as_bytes());
            });
        }

        let stdout = collect(child.stdout.take());
        let stderr = collect(child.stderr.take());

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => return Execution::timed_out(),
            Err(e) => {
                let _ = child.kill();
                return Execution::failed(format!("Execution Error: {}", e));
            }
        };

        Execution::from_output(Output {
            status,
            stdout: stdout.recv().unwrap_or_default(),
            stderr: stderr.recv().unwrap_or_default(),
        })
    }
}
