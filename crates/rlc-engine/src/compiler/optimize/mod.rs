//! IR Optimization
//!
//! Three layers:
//!
//! - analyses (`analysis`, `loops`): def/use sites, liveness, loop forest
//! - rewrite primitives (`rewrite`, `repair`): pure `(code, position)`
//!   transformations that return the input unchanged when ineligible
//! - drivers: the deterministic four-pass pipeline behind
//!   [`Optimizer::optimize`], and the Q-learning [`Policy`] driven by
//!   [`Optimizer::train_episode`]
//!
//! The two drivers are independent. `optimize` never reads or writes the
//! policy's table, so its output depends only on its input.

pub mod analysis;
pub mod loops;
mod passes;
pub mod policy;
pub mod repair;
pub mod rewrite;

pub use analysis::{CodeFacts, DefUse};
pub use loops::{find_loops, LoopInfo};
pub use policy::{ActionKind, OptimizationAction, Policy};

use crate::compiler::ir::Instruction;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, info_span};

/// Optimizer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Q-learning step size (alpha)
    pub learning_rate: f64,
    /// Future reward discount (gamma)
    pub discount: f64,
    /// Exploration probability
    pub epsilon: f64,
    /// Upper bound on control-flow repair fixes per run
    pub max_repair_rounds: usize,
    /// Seed for the exploration RNG; entropy when absent
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount: 0.9,
            epsilon: 0.1,
            max_repair_rounds: 16,
            seed: None,
        }
    }
}

/// A named rewrite, as recorded in the optimization log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rewrite {
    ConstantPropagation,
    ConstantFolding,
    LoopInvariantMotion,
    DeadCodeElimination,
    CommonSubexpression,
    StrengthReduction,
    ConditionRepair,
    IncrementRewrite,
}

impl Rewrite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rewrite::ConstantPropagation => "constant_propagation",
            Rewrite::ConstantFolding => "constant_folding",
            Rewrite::LoopInvariantMotion => "loop_invariant_motion",
            Rewrite::DeadCodeElimination => "dead_code_elimination",
            Rewrite::CommonSubexpression => "common_subexpression",
            Rewrite::StrengthReduction => "strength_reduction",
            Rewrite::ConditionRepair => "condition_repair",
            Rewrite::IncrementRewrite => "increment_rewrite",
        }
    }
}

impl fmt::Display for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applied rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizationLogEntry {
    pub rewrite: Rewrite,
    /// Position the rewrite applied at, in the code as it was at the time
    pub position: usize,
}

impl fmt::Display for OptimizationLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Applied {} at position {}", self.rewrite, self.position)
    }
}

/// Statistics about optimizations performed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptStats {
    /// Operands replaced by known literals
    pub constants_propagated: usize,
    /// Arithmetic instructions folded to literals
    pub constants_folded: usize,
    /// Instructions moved out of loops
    pub invariants_hoisted: usize,
    /// Dead instructions removed
    pub dead_instructions_removed: usize,
    /// Common subexpressions and strength reductions
    pub expressions_simplified: usize,
    /// Control-flow repairs
    pub repairs: usize,
}

impl OptStats {
    pub fn from_log(log: &[OptimizationLogEntry]) -> Self {
        let mut stats = Self::default();
        for entry in log {
            match entry.rewrite {
                Rewrite::ConstantPropagation => stats.constants_propagated += 1,
                Rewrite::ConstantFolding => stats.constants_folded += 1,
                Rewrite::LoopInvariantMotion => stats.invariants_hoisted += 1,
                Rewrite::DeadCodeElimination => stats.dead_instructions_removed += 1,
                Rewrite::CommonSubexpression | Rewrite::StrengthReduction => {
                    stats.expressions_simplified += 1
                }
                Rewrite::ConditionRepair | Rewrite::IncrementRewrite => stats.repairs += 1,
            }
        }
        stats
    }
}

/// Optimizer owning a long-lived, lock-guarded learning policy
#[derive(Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    policy: Mutex<Policy>,
}

impl Optimizer {
    /// Create an optimizer with the given configuration
    pub fn new(config: OptimizerConfig) -> Self {
        let policy = Mutex::new(Policy::new(&config));
        Self { config, policy }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Lock the policy. Its table persists across every call on this
    /// optimizer.
    pub fn policy(&self) -> MutexGuard<'_, Policy> {
        self.policy.lock()
    }

    /// Run the deterministic pipeline: constant propagation and folding,
    /// loop-invariant hoisting of constant assignments, dead-code
    /// elimination, then bounded control-flow repair.
    pub fn optimize(&self, code: &[Instruction]) -> (Vec<Instruction>, Vec<OptimizationLogEntry>) {
        let span = info_span!("optimize", instructions = code.len());
        let _guard = span.enter();

        let mut optimized = code.to_vec();
        let mut log = Vec::new();

        passes::fold_constants(&mut optimized, &mut log);
        passes::hoist_constant_assignments(&mut optimized, &mut log);
        passes::eliminate_dead_code(&mut optimized, &mut log);
        passes::repair_control_flow(&mut optimized, &mut log, self.config.max_repair_rounds);

        info!(
            before = code.len(),
            after = optimized.len(),
            rewrites = log.len(),
            "optimization finished"
        );
        (optimized, log)
    }

    /// Walk `code` once, letting the policy pick and apply one rewrite per
    /// position and learning from the reward of each applied rewrite.
    pub fn train_episode(
        &self,
        code: &[Instruction],
    ) -> (Vec<Instruction>, Vec<OptimizationLogEntry>) {
        let mut policy = self.policy.lock();
        let mut code = code.to_vec();
        let mut log = Vec::new();
        let mut position = 0;

        while position < code.len() {
            let state = Policy::state_key(&code, position);
            let actions = Policy::possible_actions(&code, position);

            if let Some(mut action) = policy.choose_action(&state, &actions) {
                let next = Policy::apply_action(&code, &action);
                if next != code {
                    let reward = Policy::calculate_reward(&code, &next);
                    let next_state = Policy::state_key(&next, position + 1);
                    let value = policy.update_q_value(&state, &mut action, reward, &next_state);
                    debug!(action = %action.key(), reward, value, "policy update");
                    log.push(OptimizationLogEntry {
                        rewrite: action.kind.rewrite(),
                        position,
                    });
                    code = next;
                }
            }
            position += 1;
        }

        (code, log)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::{render_listing, Opcode};
    use crate::compiler::lower::generate;
    use crate::parser::parse_source;
    use std::sync::Arc;

    fn lower(source: &str) -> Vec<Instruction> {
        generate(&parse_source(source).unwrap())
    }

    fn optimize(source: &str) -> (Vec<String>, Vec<String>) {
        let (code, log) = Optimizer::default().optimize(&lower(source));
        (
            render_listing(&code),
            log.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn test_config_defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount, 0.9);
        assert_eq!(config.epsilon, 0.1);
        assert_eq!(config.max_repair_rounds, 16);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_folds_through_variables() {
        let (code, log) = optimize("x = 2; y = x + 3; print(y);");
        assert_eq!(code, vec!["y = 5", "PRINT y"]);
        assert!(log.contains(&"Applied constant_folding at position 1".to_string()));
        assert!(log.iter().any(|e| e.starts_with("Applied dead_code_elimination")));
    }

    #[test]
    fn test_removes_unused_assignment() {
        let (code, log) = optimize("a = 1; print(2);");
        assert_eq!(code, vec!["PRINT 2"]);
        assert_eq!(log, vec!["Applied dead_code_elimination at position 0"]);
    }

    #[test]
    fn test_loop_survives_optimization() {
        let (code, _) = optimize("i = 0; while (i < 3) { print(i); i += 1; }");
        assert_eq!(
            code,
            vec![
                "i = 0",
                "L1:",
                "t1 = i < 3",
                "IF_FALSE t1 GOTO L2",
                "PRINT i",
                "i = i + 1",
                "GOTO L1",
                "L2:",
            ]
        );
    }

    #[test]
    fn test_hoists_constant_out_of_loop() {
        let (code, log) = optimize("i = 0; while (i < 3) { k = 5; print(k); i += 1; }");
        assert_eq!(&code[..3], &["i = 0", "k = 5", "L1:"]);
        assert!(log.contains(&"Applied loop_invariant_motion at position 4".to_string()));
    }

    #[test]
    fn test_never_removes_io() {
        let source = "scan(a); scan(b); print(a); x = a * 2;";
        let before = lower(source);
        let (after, _) = Optimizer::default().optimize(&before);
        let count = |code: &[Instruction], op: Opcode| code.iter().filter(|i| i.op == op).count();
        assert_eq!(count(&after, Opcode::Scan), 2);
        assert_eq!(count(&after, Opcode::Print), 1);
        assert!(after.iter().all(|i| i.defines() != Some("x")));
    }

    #[test]
    fn test_optimize_is_deterministic_and_leaves_policy_alone() {
        let optimizer = Optimizer::default();
        let code = lower("x = 1 + 2; while (x < 10) { x += 1; } print(x);");
        let first = optimizer.optimize(&code);
        let second = optimizer.optimize(&code);
        assert_eq!(first, second);
        assert!(optimizer.policy().is_empty());
    }

    #[test]
    fn test_stats_from_log() {
        let (_, log) = Optimizer::default().optimize(&lower("x = 2; y = x + 3; print(y);"));
        let stats = OptStats::from_log(&log);
        assert_eq!(stats.constants_folded, 1);
        assert_eq!(stats.constants_propagated, 2);
        assert_eq!(stats.dead_instructions_removed, 2);
        assert_eq!(stats.repairs, 0);
    }

    #[test]
    fn test_train_episode_learns() {
        let optimizer = Optimizer::new(OptimizerConfig {
            seed: Some(42),
            ..OptimizerConfig::default()
        });
        let code = lower("a = 1; x = 2 * 3; print(x);");
        let (trained, log) = optimizer.train_episode(&code);
        assert!(!log.is_empty());
        assert_ne!(trained, code);
        assert!(!optimizer.policy().is_empty());
        assert!(trained.iter().any(|i| i.op == Opcode::Print));
    }

    #[test]
    fn test_policy_shared_across_threads() {
        let optimizer = Arc::new(Optimizer::new(OptimizerConfig {
            seed: Some(1),
            ..OptimizerConfig::default()
        }));
        let code = lower("a = 1; b = 2 + 2; print(b);");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let optimizer = Arc::clone(&optimizer);
                let code = code.clone();
                std::thread::spawn(move || optimizer.train_episode(&code))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(!optimizer.policy().is_empty());
    }
}
