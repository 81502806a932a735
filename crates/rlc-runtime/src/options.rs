//! Runtime configuration (rlc.toml)
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! timeout_ms = 2000
//! interpreter = "python3"
//! optimize = true
//!
//! [optimizer]
//! epsilon = 0.05
//! seed = 7
//! ```

use rlc_engine::OptimizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::RuntimeError;

/// Default file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "rlc.toml";

/// Options controlling the compile-and-run pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
    /// Wall-clock limit for the generated program, in milliseconds
    pub timeout_ms: u64,

    /// Interpreter executable for generated programs
    pub interpreter: String,

    /// Arguments placed before the program file path
    pub interpreter_args: Vec<String>,

    /// Run the deterministic optimizer over the IR
    pub optimize: bool,

    /// Optimizer tuning
    pub optimizer: OptimizerConfig,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            interpreter: "python3".to_string(),
            interpreter_args: Vec::new(),
            optimize: true,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl RuntimeOptions {
    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeError> {
        let options: RuntimeOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.timeout_ms == 0 {
            return Err(RuntimeError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.interpreter.trim().is_empty() {
            return Err(RuntimeError::Config(
                "interpreter cannot be empty".to_string(),
            ));
        }

        let opt = &self.optimizer;
        if !(0.0..=1.0).contains(&opt.epsilon) {
            return Err(RuntimeError::Config(format!(
                "optimizer.epsilon must be within [0, 1], got {}",
                opt.epsilon
            )));
        }
        if !(0.0..=1.0).contains(&opt.learning_rate) || !(0.0..=1.0).contains(&opt.discount) {
            return Err(RuntimeError::Config(
                "optimizer.learning_rate and optimizer.discount must be within [0, 1]".to_string(),
            ));
        }

        Ok(())
    }

    /// Timeout as a `Duration`
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}
