//! Q-learning Optimization Policy
//!
//! A tabular policy over rewrite choices. States are a three-opcode window
//! around a position, actions are `<kind>_<position>`, and values are
//! learned by one-step temporal-difference updates. The table lives as long
//! as the owning [`Optimizer`](super::Optimizer) and is never reset between
//! compilations.

use super::analysis::CodeFacts;
use super::rewrite;
use super::{OptimizerConfig, Rewrite};
use crate::compiler::ir::{Instruction, Opcode};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Rewrite kinds the policy can choose between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ConstantFolding,
    DeadCodeElimination,
    CommonSubexpression,
    StrengthReduction,
    LoopInvariantMotion,
}

impl ActionKind {
    /// Name used in action keys
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ConstantFolding => "constant_folding",
            ActionKind::DeadCodeElimination => "dead_code_elimination",
            ActionKind::CommonSubexpression => "common_subexpression",
            ActionKind::StrengthReduction => "strength_reduction",
            ActionKind::LoopInvariantMotion => "loop_invariant",
        }
    }

    /// Fixed prior attached to a freshly enumerated action
    pub fn heuristic_confidence(&self) -> f64 {
        match self {
            ActionKind::ConstantFolding => 0.8,
            ActionKind::DeadCodeElimination => 0.7,
            ActionKind::CommonSubexpression => 0.6,
            ActionKind::StrengthReduction => 0.5,
            ActionKind::LoopInvariantMotion => 0.9,
        }
    }

    pub fn rewrite(&self) -> Rewrite {
        match self {
            ActionKind::ConstantFolding => Rewrite::ConstantFolding,
            ActionKind::DeadCodeElimination => Rewrite::DeadCodeElimination,
            ActionKind::CommonSubexpression => Rewrite::CommonSubexpression,
            ActionKind::StrengthReduction => Rewrite::StrengthReduction,
            ActionKind::LoopInvariantMotion => Rewrite::LoopInvariantMotion,
        }
    }
}

/// One candidate rewrite at one position
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationAction {
    pub kind: ActionKind,
    pub position: usize,
    /// Heuristic prior, overwritten with the learned value on update
    pub confidence: f64,
    /// Innermost enclosing loop, for loop-invariant motion
    pub loop_index: Option<usize>,
}

impl OptimizationAction {
    pub fn new(kind: ActionKind, position: usize) -> Self {
        Self {
            kind,
            position,
            confidence: kind.heuristic_confidence(),
            loop_index: None,
        }
    }

    pub fn with_loop(mut self, loop_index: usize) -> Self {
        self.loop_index = Some(loop_index);
        self
    }

    /// `<kind>_<position>`
    pub fn key(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.position)
    }
}

/// Tabular Q-learning policy
#[derive(Debug)]
pub struct Policy {
    q_table: FxHashMap<String, FxHashMap<String, f64>>,
    learning_rate: f64,
    discount: f64,
    epsilon: f64,
    rng: StdRng,
}

impl Policy {
    /// Create an empty policy. A configured seed makes exploration
    /// reproducible.
    pub fn new(config: &OptimizerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            q_table: FxHashMap::default(),
            learning_rate: config.learning_rate,
            discount: config.discount,
            epsilon: config.epsilon,
            rng,
        }
    }

    /// Encode the context of `position` as `<op>_prev_<op>_next_<op>`,
    /// with `END` for neighbours outside the sequence. Positions past the
    /// end encode as `END`.
    pub fn state_key(code: &[Instruction], position: usize) -> String {
        let Some(current) = code.get(position) else {
            return "END".to_string();
        };
        let prev = position
            .checked_sub(1)
            .and_then(|p| code.get(p))
            .map_or("END", |i| i.op.mnemonic());
        let next = code.get(position + 1).map_or("END", |i| i.op.mnemonic());
        format!("{}_prev_{}_next_{}", current.op.mnemonic(), prev, next)
    }

    /// Every rewrite whose precondition holds at `position`.
    pub fn possible_actions(code: &[Instruction], position: usize) -> Vec<OptimizationAction> {
        let Some(instr) = code.get(position) else {
            return Vec::new();
        };
        let facts = CodeFacts::compute(code);
        let mut actions = Vec::new();

        if rewrite::folded(instr).is_some() {
            actions.push(OptimizationAction::new(ActionKind::ConstantFolding, position));
        }
        if facts.is_dead(code, position) {
            actions.push(OptimizationAction::new(ActionKind::DeadCodeElimination, position));
        }
        if rewrite::find_common_subexpression(code, position).is_some() {
            actions.push(OptimizationAction::new(ActionKind::CommonSubexpression, position));
        }
        if rewrite::reduced(instr).is_some() {
            actions.push(OptimizationAction::new(ActionKind::StrengthReduction, position));
        }
        if let Some(loop_index) = rewrite::hoist_candidate(code, position, &facts.loops) {
            actions.push(
                OptimizationAction::new(ActionKind::LoopInvariantMotion, position)
                    .with_loop(loop_index),
            );
        }

        actions
    }

    /// Epsilon-greedy choice among `actions`.
    ///
    /// Exploits the highest learned value for `state` (first wins on ties);
    /// explores uniformly with probability epsilon or when nothing has been
    /// learned for `state` yet.
    pub fn choose_action(
        &mut self,
        state: &str,
        actions: &[OptimizationAction],
    ) -> Option<OptimizationAction> {
        if actions.is_empty() {
            return None;
        }

        let explore = self.rng.gen::<f64>() < self.epsilon;
        let learned = self.q_table.get(state).filter(|values| !values.is_empty());

        match learned {
            Some(values) if !explore => {
                let value_of = |action: &OptimizationAction| {
                    values.get(&action.key()).copied().unwrap_or(0.0)
                };
                let mut best = &actions[0];
                let mut best_value = value_of(best);
                for action in &actions[1..] {
                    let value = value_of(action);
                    if value > best_value {
                        best = action;
                        best_value = value;
                    }
                }
                Some(best.clone())
            }
            _ => actions.choose(&mut self.rng).cloned(),
        }
    }

    /// One-step Q-learning update. Returns the new value, which also
    /// replaces the action's confidence.
    pub fn update_q_value(
        &mut self,
        state: &str,
        action: &mut OptimizationAction,
        reward: f64,
        next_state: &str,
    ) -> f64 {
        let max_next = self
            .q_table
            .get(next_state)
            .and_then(|values| values.values().copied().reduce(f64::max))
            .unwrap_or(0.0);

        let value = self
            .q_table
            .entry(state.to_string())
            .or_default()
            .entry(action.key())
            .or_insert(0.0);
        *value += self.learning_rate * (reward + self.discount * max_next - *value);

        action.confidence = *value;
        *value
    }

    /// Learned value, zero when unseen
    pub fn q_value(&self, state: &str, action_key: &str) -> f64 {
        self.q_table
            .get(state)
            .and_then(|values| values.get(action_key))
            .copied()
            .unwrap_or(0.0)
    }

    /// Score a transformation from `original` to `optimized`.
    pub fn calculate_reward(original: &[Instruction], optimized: &[Instruction]) -> f64 {
        let before = original.len() as f64;
        let after = optimized.len() as f64;
        let mut reward = 10.0 * (before - after);

        for instr in optimized {
            match instr.op {
                Opcode::Assign if instr.arg1.as_ref().is_some_and(|a| a.is_constant()) => {
                    reward += 5.0;
                }
                Opcode::Comment
                    if instr
                        .comment_text()
                        .is_some_and(|text| text.to_lowercase().contains("loop")) =>
                {
                    reward += 15.0;
                }
                _ => {}
            }
        }

        if after > before {
            reward -= 20.0;
        }
        reward
    }

    /// Apply a chosen action. Loop-invariant motion also drops a marker
    /// comment ahead of the hoisted instruction.
    pub fn apply_action(code: &[Instruction], action: &OptimizationAction) -> Vec<Instruction> {
        let position = action.position;
        match action.kind {
            ActionKind::ConstantFolding => rewrite::fold_constant(code, position).into_owned(),
            ActionKind::DeadCodeElimination => {
                rewrite::eliminate_dead_code(code, position).into_owned()
            }
            ActionKind::CommonSubexpression => {
                rewrite::eliminate_common_subexpression(code, position).into_owned()
            }
            ActionKind::StrengthReduction => rewrite::reduce_strength(code, position).into_owned(),
            ActionKind::LoopInvariantMotion => {
                let Some(loop_index) = action.loop_index else {
                    return code.to_vec();
                };
                let loops = super::loops::find_loops(code);
                match rewrite::hoist_invariant(code, position, loop_index, &loops) {
                    Cow::Borrowed(_) => code.to_vec(),
                    Cow::Owned(mut out) => {
                        let root = &loops[super::loops::outermost(&loops, loop_index)];
                        let marker = format!(
                            "loop-invariant motion: `{}` hoisted out of loop {}",
                            out[root.start], root.label
                        );
                        out.insert(root.start, Instruction::comment(marker));
                        out
                    }
                }
            }
        }
    }

    /// Number of states with learned values
    pub fn len(&self) -> usize {
        self.q_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_table.is_empty()
    }
}
