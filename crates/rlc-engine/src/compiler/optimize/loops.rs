//! Loop Discovery
//!
//! Loops are recovered from the linear IR: a `GOTO` whose target label
//! appears earlier is a back-edge, and the span between the label and the
//! jump is the loop. Records are only valid for the code they were computed
//! from; recompute after any structural edit.

use crate::compiler::ir::{Instruction, Opcode};
use rustc_hash::{FxHashMap, FxHashSet};

/// A loop discovered from a back-edge
#[derive(Debug, Clone, PartialEq)]
pub struct LoopInfo {
    /// Index of the loop's start `LABEL`
    pub start: usize,
    /// Index of the back-edge `GOTO`
    pub end: usize,
    /// Index of the exit test (first `IF_FALSE` in the span)
    pub condition: usize,
    /// Start label text
    pub label: String,
    /// Every location defined strictly inside the span
    pub modified_vars: FxHashSet<String>,
    /// Innermost strictly enclosing loop
    pub parent: Option<usize>,
    /// Loops whose parent is this one
    pub children: Vec<usize>,
}

impl LoopInfo {
    /// True if `position` lies within `[start, end]`
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }

    /// True if `position` lies strictly between the label and the back-edge
    pub fn contains_strictly(&self, position: usize) -> bool {
        self.start < position && position < self.end
    }

    /// True if `other`'s span lies within this one and is not identical
    pub fn encloses(&self, other: &LoopInfo) -> bool {
        self.start <= other.start
            && other.end <= self.end
            && (self.start, self.end) != (other.start, other.end)
    }

    /// Number of instructions in the span, label and back-edge included
    pub fn span_len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Find every optimizable loop, sorted by start index, with parent/child
/// links forming a forest.
///
/// A back-edge with no `IF_FALSE` in its span is not tracked.
pub fn find_loops(code: &[Instruction]) -> Vec<LoopInfo> {
    let labels: FxHashMap<&str, usize> = code
        .iter()
        .enumerate()
        .filter(|(_, instr)| instr.op == Opcode::Label)
        .filter_map(|(index, instr)| instr.jump_label().map(|label| (label, index)))
        .collect();

    let mut loops = Vec::new();
    for (index, instr) in code.iter().enumerate() {
        if instr.op != Opcode::Goto {
            continue;
        }
        let Some(label) = instr.jump_label() else {
            continue;
        };
        let Some(&target) = labels.get(label) else {
            continue;
        };
        if target >= index {
            continue;
        }
        let Some(condition) = (target..index).find(|&i| code[i].op == Opcode::IfFalse) else {
            continue;
        };

        let modified_vars = code[target + 1..index]
            .iter()
            .filter_map(Instruction::defines)
            .map(str::to_string)
            .collect();

        loops.push(LoopInfo {
            start: target,
            end: index,
            condition,
            label: label.to_string(),
            modified_vars,
            parent: None,
            children: Vec::new(),
        });
    }

    loops.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let parents: Vec<Option<usize>> = (0..loops.len())
        .map(|inner| {
            (0..loops.len())
                .filter(|&outer| outer != inner && loops[outer].encloses(&loops[inner]))
                .min_by_key(|&outer| loops[outer].span_len())
        })
        .collect();

    for (inner, parent) in parents.into_iter().enumerate() {
        if let Some(outer) = parent {
            loops[inner].parent = Some(outer);
            loops[outer].children.push(inner);
        }
    }

    loops
}

/// Walk parent links from `index` to the root of its tree.
pub fn outermost(loops: &[LoopInfo], index: usize) -> usize {
    let mut current = index;
    while let Some(parent) = loops.get(current).and_then(|l| l.parent) {
        current = parent;
    }
    current
}

/// The innermost loop whose body strictly contains `position`.
pub fn innermost_at(loops: &[LoopInfo], position: usize) -> Option<usize> {
    loops
        .iter()
        .enumerate()
        .filter(|(_, l)| l.contains_strictly(position))
        .min_by_key(|(_, l)| l.span_len())
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lower::generate;
    use crate::parser::parse_source;

    fn lower(source: &str) -> Vec<Instruction> {
        generate(&parse_source(source).unwrap())
    }

    #[test]
    fn test_single_loop() {
        let code = lower("i = 0; while (i < 3) { print(i); i += 1; }");
        let loops = find_loops(&code);
        assert_eq!(loops.len(), 1);

        let lp = &loops[0];
        assert_eq!(code[lp.start].op, Opcode::Label);
        assert_eq!(code[lp.end].op, Opcode::Goto);
        assert_eq!(code[lp.condition].op, Opcode::IfFalse);
        assert_eq!(lp.label, "L1");
        assert!(lp.modified_vars.contains("i"));
        assert!(lp.modified_vars.contains("t1"));
        assert_eq!(lp.parent, None);
    }

    #[test]
    fn test_nested_loops() {
        let code = lower(
            "i = 0; while (i < 3) { j = 0; while (j < 2) { j += 1; } i += 1; }",
        );
        let loops = find_loops(&code);
        assert_eq!(loops.len(), 2);

        let (outer, inner) = (&loops[0], &loops[1]);
        assert!(outer.start < inner.start && inner.end < outer.end);
        assert_eq!(inner.parent, Some(0));
        assert_eq!(outer.children, vec![1]);
        assert!(outer.modified_vars.contains("j"));
        assert!(!inner.modified_vars.contains("i"));
        assert_eq!(outermost(&loops, 1), 0);
    }

    #[test]
    fn test_sibling_loops_form_a_forest() {
        let code = lower("while (1) { print(1); } while (2) { print(2); }");
        let loops = find_loops(&code);
        assert_eq!(loops.len(), 2);
        assert!(loops.iter().all(|l| l.parent.is_none()));
        assert!(loops[0].end < loops[1].start);
    }

    #[test]
    fn test_forward_jumps_are_not_loops() {
        let code = lower("x = 1; if (x > 0) { print(x); } else { print(0); }");
        assert!(find_loops(&code).is_empty());
    }

    #[test]
    fn test_back_edge_without_exit_test_is_ignored() {
        let code = vec![
            Instruction::label("L1"),
            Instruction::print(crate::compiler::ir::Operand::Number(1.0)),
            Instruction::goto("L1"),
        ];
        assert!(find_loops(&code).is_empty());
    }

    #[test]
    fn test_innermost_at() {
        let code = lower("while (a) { while (b) { print(1); } }");
        let loops = find_loops(&code);
        let print_pos = code.iter().position(|i| i.op == Opcode::Print).unwrap();
        assert_eq!(innermost_at(&loops, print_pos), Some(1));
        assert_eq!(innermost_at(&loops, loops[0].start), None);
    }
}
