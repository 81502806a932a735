//! Rewrite Primitives
//!
//! Each primitive takes a code sequence and a position and returns the
//! rewritten sequence. An ineligible position is a no-op that hands back
//! the input as `Cow::Borrowed`, so callers can detect "no change" without
//! comparing sequences. Primitives never fail.

use super::analysis::CodeFacts;
use super::loops::{innermost_at, outermost, LoopInfo};
use crate::compiler::ir::{BinaryOp, Instruction, Opcode, Operand};
use std::borrow::Cow;

fn replace_at(code: &[Instruction], position: usize, instr: Instruction) -> Cow<'_, [Instruction]> {
    let mut out = code.to_vec();
    out[position] = instr;
    Cow::Owned(out)
}

// ============================================================================
// Constant folding
// ============================================================================

fn evaluate(op: BinaryOp, left: f64, right: f64) -> Option<f64> {
    let value = match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div if right == 0.0 => return None,
        BinaryOp::Div => left / right,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// The folded form of an arithmetic instruction on two numeric literals.
///
/// Division by a literal zero is refused.
pub fn folded(instr: &Instruction) -> Option<Instruction> {
    let Opcode::Binary(op) = instr.op else {
        return None;
    };
    if !op.is_arithmetic() {
        return None;
    }
    let left = instr.arg1.as_ref()?.as_number()?;
    let right = instr.arg2.as_ref()?.as_number()?;
    let result = instr.result.as_ref()?;
    let value = evaluate(op, left, right)?;
    Some(Instruction::assign(Operand::Number(value), result.clone()))
}

/// Replace `result = a op b` on numeric literals with `result = value`.
pub fn fold_constant(code: &[Instruction], position: usize) -> Cow<'_, [Instruction]> {
    match code.get(position).and_then(folded) {
        Some(instr) => replace_at(code, position, instr),
        None => Cow::Borrowed(code),
    }
}

// ============================================================================
// Dead code elimination
// ============================================================================

/// Delete the instruction at `position` if it defines a location that is
/// never read afterwards and is not effectful or control-bearing.
pub fn eliminate_dead_code(code: &[Instruction], position: usize) -> Cow<'_, [Instruction]> {
    if CodeFacts::compute(code).is_dead(code, position) {
        let mut out = code.to_vec();
        out.remove(position);
        Cow::Owned(out)
    } else {
        Cow::Borrowed(code)
    }
}

// ============================================================================
// Common subexpression elimination
// ============================================================================

/// Find an earlier instruction computing the same pure expression whose
/// value still holds at `position`.
///
/// The search stops at the nearest `LABEL` (a join point), and fails if the
/// earlier result or any operand is redefined in between.
pub fn find_common_subexpression(code: &[Instruction], position: usize) -> Option<usize> {
    let current = code.get(position)?;
    if !matches!(current.op, Opcode::Binary(_) | Opcode::Unary(_)) {
        return None;
    }
    let result = current.result.as_deref()?;

    for earlier in (0..position).rev() {
        let candidate = &code[earlier];
        if candidate.op == Opcode::Label {
            return None;
        }
        if candidate.op != current.op || candidate.arg1 != current.arg1 || candidate.arg2 != current.arg2 {
            continue;
        }

        let reused = candidate.result.as_deref()?;
        if reused == result || candidate.reads(reused) {
            return None;
        }
        let clobbered = code[earlier + 1..position]
            .iter()
            .filter_map(Instruction::defines)
            .any(|name| name == reused || current.reads(name));
        return (!clobbered).then_some(earlier);
    }

    None
}

/// Replace a recomputation with `result = <earlier result>`.
pub fn eliminate_common_subexpression(
    code: &[Instruction],
    position: usize,
) -> Cow<'_, [Instruction]> {
    let Some(earlier) = find_common_subexpression(code, position) else {
        return Cow::Borrowed(code);
    };
    match (&code[earlier].result, &code[position].result) {
        (Some(reused), Some(result)) => replace_at(
            code,
            position,
            Instruction::assign(Operand::name(reused.clone()), result.clone()),
        ),
        _ => Cow::Borrowed(code),
    }
}

// ============================================================================
// Strength reduction
// ============================================================================

fn is_two(operand: &Option<Operand>) -> bool {
    operand.as_ref().and_then(Operand::as_number) == Some(2.0)
}

/// `x * 2` or `2 * x` rewritten as `x + x`.
pub fn reduced(instr: &Instruction) -> Option<Instruction> {
    if instr.op != Opcode::Binary(BinaryOp::Mul) {
        return None;
    }
    let other = if is_two(&instr.arg2) {
        instr.arg1.clone()?
    } else if is_two(&instr.arg1) {
        instr.arg2.clone()?
    } else {
        return None;
    };
    let result = instr.result.clone()?;
    Some(Instruction::binary(BinaryOp::Add, other.clone(), other, result))
}

pub fn reduce_strength(code: &[Instruction], position: usize) -> Cow<'_, [Instruction]> {
    match code.get(position).and_then(reduced) {
        Some(instr) => replace_at(code, position, instr),
        None => Cow::Borrowed(code),
    }
}

// ============================================================================
// Loop-invariant motion
// ============================================================================

/// Decide whether the instruction at `position` can be moved in front of
/// its outermost enclosing loop, returning the innermost loop index.
///
/// The instruction must be pure, its operands must not be modified anywhere
/// in the outermost loop, its result must be defined exactly once there and
/// must not feed an `IF_FALSE`. Every read of the result must follow the
/// instruction with no label or jump in between, so the value is only ever
/// observed right after it is computed.
pub fn hoist_candidate(code: &[Instruction], position: usize, loops: &[LoopInfo]) -> Option<usize> {
    let instr = code.get(position)?;
    if !instr.op.is_pure() {
        return None;
    }
    let result = instr.result.as_deref()?;
    let inner = innermost_at(loops, position)?;
    let root = &loops[outermost(loops, inner)];

    if instr.uses().any(|name| root.modified_vars.contains(name)) {
        return None;
    }

    let body = code.get(root.start..=root.end)?;
    if body.iter().filter(|i| i.defines() == Some(result)).count() != 1 {
        return None;
    }
    if body.iter().any(|i| i.op == Opcode::IfFalse && i.reads(result)) {
        return None;
    }

    let reads_are_local = code
        .iter()
        .enumerate()
        .filter(|(_, i)| i.reads(result))
        .all(|(read, _)| {
            read > position && !code[position + 1..read].iter().any(|i| i.op.is_control())
        });

    reads_are_local.then_some(inner)
}

/// Move the instruction at `position` to just before the start label of the
/// outermost loop containing loop `loop_index`.
///
/// Eligibility is the caller's decision; see [`hoist_candidate`].
pub fn hoist_invariant<'a>(
    code: &'a [Instruction],
    position: usize,
    loop_index: usize,
    loops: &[LoopInfo],
) -> Cow<'a, [Instruction]> {
    if loop_index >= loops.len() || position >= code.len() {
        return Cow::Borrowed(code);
    }
    let root = &loops[outermost(loops, loop_index)];
    if position <= root.start || root.start >= code.len() {
        return Cow::Borrowed(code);
    }

    let mut out = code.to_vec();
    let instr = out.remove(position);
    out.insert(root.start, instr);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::render_listing;
    use crate::compiler::lower::generate;
    use crate::compiler::optimize::loops::find_loops;
    use crate::parser::parse_source;

    fn lower(source: &str) -> Vec<Instruction> {
        generate(&parse_source(source).unwrap())
    }

    fn num(n: f64) -> Operand {
        Operand::Number(n)
    }

    #[test]
    fn test_fold_arithmetic() {
        let code = vec![Instruction::binary(BinaryOp::Mul, num(6.0), num(7.0), "t1")];
        let folded = fold_constant(&code, 0);
        assert_eq!(render_listing(&folded), vec!["t1 = 42"]);

        let code = vec![Instruction::binary(BinaryOp::Div, num(1.0), num(4.0), "t1")];
        assert_eq!(render_listing(&fold_constant(&code, 0)), vec!["t1 = 0.25"]);
    }

    #[test]
    fn test_fold_refuses_division_by_zero() {
        let code = vec![Instruction::binary(BinaryOp::Div, num(5.0), num(0.0), "t1")];
        assert!(matches!(fold_constant(&code, 0), Cow::Borrowed(_)));
    }

    #[test]
    fn test_fold_ignores_non_numeric_and_comparisons() {
        let code = vec![
            Instruction::binary(BinaryOp::Add, Operand::Str("a".into()), num(1.0), "t1"),
            Instruction::binary(BinaryOp::Less, num(1.0), num(2.0), "t2"),
            Instruction::binary(BinaryOp::Add, Operand::name("x"), num(1.0), "t3"),
        ];
        for position in 0..code.len() {
            assert!(matches!(fold_constant(&code, position), Cow::Borrowed(_)));
        }
        assert!(matches!(fold_constant(&code, 99), Cow::Borrowed(_)));
    }

    #[test]
    fn test_fold_is_idempotent() {
        let code = lower("print(1 + 2); x = 3 * 4; y = x - 1;");
        let mut once = code.clone();
        for position in 0..once.len() {
            once = fold_constant(&once, position).into_owned();
        }
        let mut twice = once.clone();
        for position in 0..twice.len() {
            twice = fold_constant(&twice, position).into_owned();
        }
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dead_code_removed() {
        let code = lower("a = 1; print(2);");
        let out = eliminate_dead_code(&code, 0);
        assert_eq!(render_listing(&out), vec!["PRINT 2"]);
    }

    #[test]
    fn test_dead_code_keeps_used_and_effectful() {
        let code = lower("scan(a); b = a; print(b);");
        for position in 0..code.len() {
            assert!(matches!(eliminate_dead_code(&code, position), Cow::Borrowed(_)));
        }
    }

    #[test]
    fn test_common_subexpression() {
        let code = lower("x = a + b; y = a + b;");
        // t1 = a + b; x = t1; t2 = a + b; y = t2
        assert_eq!(find_common_subexpression(&code, 2), Some(0));
        let out = eliminate_common_subexpression(&code, 2);
        assert_eq!(render_listing(&out)[2], "t2 = t1");
    }

    #[test]
    fn test_common_subexpression_blocked_by_redefinition() {
        let code = lower("x = a + b; a = 1; y = a + b;");
        let position = code.iter().rposition(|i| matches!(i.op, Opcode::Binary(_))).unwrap();
        assert_eq!(find_common_subexpression(&code, position), None);
    }

    #[test]
    fn test_common_subexpression_blocked_by_label() {
        let code = lower("x = a + b; while (c) { y = a + b; }");
        let position = code.iter().rposition(|i| matches!(i.op, Opcode::Binary(_))).unwrap();
        assert_eq!(find_common_subexpression(&code, position), None);
    }

    #[test]
    fn test_strength_reduction() {
        let code = vec![
            Instruction::binary(BinaryOp::Mul, Operand::name("x"), num(2.0), "t1"),
            Instruction::binary(BinaryOp::Mul, num(2.0), Operand::name("y"), "t2"),
            Instruction::binary(BinaryOp::Mul, Operand::name("z"), num(3.0), "t3"),
        ];
        assert_eq!(render_listing(&reduce_strength(&code, 0))[0], "t1 = x + x");
        assert_eq!(render_listing(&reduce_strength(&code, 1))[1], "t2 = y + y");
        assert!(matches!(reduce_strength(&code, 2), Cow::Borrowed(_)));
    }

    #[test]
    fn test_hoist_to_outermost_loop() {
        let code = lower("i = 0; while (i < 2) { j = 0; while (j < 2) { k = 5; print(k); j += 1; } i += 1; }");
        let loops = find_loops(&code);
        let position = code.iter().position(|i| i.defines() == Some("k")).unwrap();

        let inner = hoist_candidate(&code, position, &loops).unwrap();
        assert_eq!(inner, 1);

        let out = hoist_invariant(&code, position, inner, &loops);
        assert_eq!(out.len(), code.len());
        assert_eq!(out[loops[0].start].to_string(), "k = 5");
        assert_eq!(out[loops[0].start + 1].op, Opcode::Label);
    }

    #[test]
    fn test_hoist_rejects_variant_and_conditional() {
        let code = lower("k = 0; i = 0; while (i < 2) { if (i > 0) { k = 5; } print(k); i += 1; }");
        let loops = find_loops(&code);
        let conditional = code.iter().rposition(|i| i.defines() == Some("k")).unwrap();
        assert_eq!(hoist_candidate(&code, conditional, &loops), None);

        let increment = code
            .iter()
            .position(|i| i.op == Opcode::Binary(BinaryOp::Add))
            .unwrap();
        assert_eq!(hoist_candidate(&code, increment, &loops), None);
    }

    #[test]
    fn test_hoist_invalid_inputs_are_noops() {
        let code = lower("while (c) { print(1); }");
        let loops = find_loops(&code);
        assert!(matches!(hoist_invariant(&code, 0, 0, &loops), Cow::Borrowed(_)));
        assert!(matches!(hoist_invariant(&code, 2, 7, &loops), Cow::Borrowed(_)));
        assert!(matches!(hoist_invariant(&code, 99, 0, &loops), Cow::Borrowed(_)));
    }
}
