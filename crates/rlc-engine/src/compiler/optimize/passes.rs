//! Deterministic Pass Pipeline
//!
//! The four passes run by [`Optimizer::optimize`](super::Optimizer::optimize).
//! Each one works on the driver's private copy of the code and re-runs its
//! analyses after every edit.

use super::analysis::CodeFacts;
use super::loops::find_loops;
use super::{repair, rewrite, OptimizationLogEntry, Rewrite};
use crate::compiler::ir::{Instruction, Opcode, Operand};
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use tracing::{debug, warn};

fn changed(code: Cow<'_, [Instruction]>) -> Option<Vec<Instruction>> {
    match code {
        Cow::Owned(code) => Some(code),
        Cow::Borrowed(_) => None,
    }
}

fn record(log: &mut Vec<OptimizationLogEntry>, rewrite: Rewrite, position: usize) {
    debug!(pass = %rewrite, position, "applied rewrite");
    log.push(OptimizationLogEntry { rewrite, position });
}

/// Replace named operands with known literal values. Returns true if any
/// operand changed.
fn substitute(instr: &mut Instruction, constants: &FxHashMap<String, Operand>) -> bool {
    let mut substituted = false;
    for operand in [&mut instr.arg1, &mut instr.arg2].into_iter().flatten() {
        let known = operand.as_name().and_then(|name| constants.get(name));
        if let Some(value) = known {
            *operand = value.clone();
            substituted = true;
        }
    }
    substituted
}

/// Pass 1: constant propagation and folding until nothing changes.
///
/// Known values are tracked per straight-line region and forgotten at every
/// label, since a label can be reached from more than one place.
pub(super) fn fold_constants(code: &mut Vec<Instruction>, log: &mut Vec<OptimizationLogEntry>) {
    loop {
        let mut progress = false;
        let mut constants: FxHashMap<String, Operand> = FxHashMap::default();

        for position in 0..code.len() {
            if code[position].op == Opcode::Label {
                constants.clear();
                continue;
            }

            if code[position].op.is_pure() && substitute(&mut code[position], &constants) {
                record(log, Rewrite::ConstantPropagation, position);
                progress = true;
            }

            if let Some(next) = changed(rewrite::fold_constant(code, position)) {
                *code = next;
                record(log, Rewrite::ConstantFolding, position);
                progress = true;
            }

            let instr = &code[position];
            if let Some(name) = instr.defines() {
                constants.remove(name);
                let literal = instr.arg1.as_ref().filter(|value| value.is_constant());
                if let (Opcode::Assign, Some(value)) = (instr.op, literal) {
                    constants.insert(name.to_string(), value.clone());
                }
            }
        }

        if !progress {
            break;
        }
    }
}

/// Pass 2: hoist constant assignments out of loops.
pub(super) fn hoist_constant_assignments(
    code: &mut Vec<Instruction>,
    log: &mut Vec<OptimizationLogEntry>,
) {
    // Every hoist moves one instruction out of all loops, so this is a
    // generous bound.
    for _ in 0..=code.len() {
        let loops = find_loops(code);
        let current: &[Instruction] = code;
        let candidate = current.iter().enumerate().find_map(|(position, instr)| {
            let constant = instr.op == Opcode::Assign
                && instr.arg1.as_ref().is_some_and(Operand::is_constant);
            if !constant {
                return None;
            }
            rewrite::hoist_candidate(current, position, &loops).map(|index| (position, index))
        });

        let Some((position, loop_index)) = candidate else {
            break;
        };
        let Some(next) = changed(rewrite::hoist_invariant(code, position, loop_index, &loops))
        else {
            break;
        };
        *code = next;
        record(log, Rewrite::LoopInvariantMotion, position);
    }
}

/// Pass 3: delete dead definitions until a full scan removes nothing.
pub(super) fn eliminate_dead_code(code: &mut Vec<Instruction>, log: &mut Vec<OptimizationLogEntry>) {
    loop {
        let mut removed = false;
        let mut facts = CodeFacts::compute(code);
        let mut position = 0;

        while position < code.len() {
            if facts.is_dead(code, position) {
                if let Some(next) = changed(rewrite::eliminate_dead_code(code, position)) {
                    *code = next;
                    record(log, Rewrite::DeadCodeElimination, position);
                    facts = CodeFacts::compute(code);
                    removed = true;
                    // The next instruction slid into this slot
                    continue;
                }
            }
            position += 1;
        }

        if !removed {
            break;
        }
    }
}

/// Pass 4: bounded control-flow repair.
pub(super) fn repair_control_flow(
    code: &mut Vec<Instruction>,
    log: &mut Vec<OptimizationLogEntry>,
    max_rounds: usize,
) {
    let mut rounds = 0;
    while let Some((rewrite, position, next)) = repair::repair_once(code) {
        if rounds >= max_rounds {
            warn!(rounds, "control-flow repair stopped at its round limit");
            break;
        }
        *code = next;
        record(log, rewrite, position);
        rounds += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::render_listing;
    use crate::compiler::lower::generate;
    use crate::parser::parse_source;

    fn lower(source: &str) -> Vec<Instruction> {
        generate(&parse_source(source).unwrap())
    }

    #[test]
    fn test_fold_propagates_within_block() {
        let mut code = lower("x = 2; y = x + 3; print(y);");
        let mut log = Vec::new();
        fold_constants(&mut code, &mut log);
        assert_eq!(
            render_listing(&code),
            vec!["x = 2", "t1 = 5", "y = 5", "PRINT y"]
        );
        assert!(log.iter().any(|e| e.rewrite == Rewrite::ConstantFolding));
    }

    #[test]
    fn test_fold_forgets_facts_at_labels() {
        let mut code = lower("i = 0; while (i < 3) { i += 1; }");
        let before = code.clone();
        let mut log = Vec::new();
        fold_constants(&mut code, &mut log);
        assert_eq!(code, before);
        assert!(log.is_empty());
    }

    #[test]
    fn test_fold_reaches_fixed_point() {
        let mut code = lower("print((1 + 2) * (3 + 4));");
        let mut log = Vec::new();
        fold_constants(&mut code, &mut log);
        assert_eq!(render_listing(&code), vec!["t1 = 3", "t2 = 7", "t3 = 21", "PRINT t3"]);
    }

    #[test]
    fn test_hoist_constant_assignment() {
        let mut code = lower("i = 0; while (i < 3) { k = 5; print(k); i += 1; }");
        let mut log = Vec::new();
        hoist_constant_assignments(&mut code, &mut log);
        let listing = render_listing(&code);
        assert_eq!(listing[1], "k = 5");
        assert_eq!(listing[2], "L1:");
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].rewrite, Rewrite::LoopInvariantMotion);
    }

    #[test]
    fn test_dead_code_cascades() {
        let mut code = lower("a = 1; b = a + 1; print(2);");
        let mut log = Vec::new();
        eliminate_dead_code(&mut code, &mut log);
        assert_eq!(render_listing(&code), vec!["PRINT 2"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_repair_is_bounded() {
        let mut code = lower("i = 0; while (i < 3) { i += 1; } j = 0; while (j < 3) { j += 1; }");
        let mut log = Vec::new();
        repair_control_flow(&mut code, &mut log, 1);
        assert_eq!(log.len(), 1);
    }
}
