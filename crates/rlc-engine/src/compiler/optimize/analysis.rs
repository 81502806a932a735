//! Def/Use and Liveness Analysis
//!
//! Positions are instruction indices, so every fact here is invalidated by
//! any edit that inserts, removes or moves an instruction.

use super::loops::{find_loops, LoopInfo};
use crate::compiler::ir::Instruction;
use rustc_hash::FxHashMap;

/// Definition and use sites per name, in ascending index order
#[derive(Debug, Clone, Default)]
pub struct DefUse {
    defs: FxHashMap<String, Vec<usize>>,
    uses: FxHashMap<String, Vec<usize>>,
}

impl DefUse {
    /// Compute def/use sites for a code sequence
    pub fn compute(code: &[Instruction]) -> Self {
        let mut def_use = Self::default();
        for (index, instr) in code.iter().enumerate() {
            for name in instr.uses() {
                def_use.uses.entry(name.to_string()).or_default().push(index);
            }
            if let Some(name) = instr.defines() {
                def_use.defs.entry(name.to_string()).or_default().push(index);
            }
        }
        def_use
    }

    pub fn defs_of(&self, name: &str) -> &[usize] {
        self.defs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn uses_of(&self, name: &str) -> &[usize] {
        self.uses.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if some use site index exceeds `position`
    pub fn used_after(&self, name: &str, position: usize) -> bool {
        self.uses_of(name).last().is_some_and(|&last| last > position)
    }

    /// True if some use site lies in `[start, end]`
    pub fn used_within(&self, name: &str, start: usize, end: usize) -> bool {
        self.uses_of(name).iter().any(|&i| start <= i && i <= end)
    }

    /// True if some definition site precedes `position`
    pub fn defined_before(&self, name: &str, position: usize) -> bool {
        self.defs_of(name).first().is_some_and(|&first| first < position)
    }
}

/// Analyses shared by the rewrite rules, computed together
#[derive(Debug, Clone, Default)]
pub struct CodeFacts {
    pub def_use: DefUse,
    pub loops: Vec<LoopInfo>,
}

impl CodeFacts {
    pub fn compute(code: &[Instruction]) -> Self {
        Self {
            def_use: DefUse::compute(code),
            loops: find_loops(code),
        }
    }

    /// A value defined at `position` is live if it is read later in the
    /// sequence, or read anywhere inside a loop that contains `position`
    /// (the back-edge can carry it to an earlier read).
    pub fn is_live_after(&self, name: &str, position: usize) -> bool {
        self.def_use.used_after(name, position)
            || self
                .loops
                .iter()
                .any(|l| l.contains(position) && self.def_use.used_within(name, l.start, l.end))
    }

    /// True if the instruction at `position` may be deleted.
    pub fn is_dead(&self, code: &[Instruction], position: usize) -> bool {
        let Some(instr) = code.get(position) else {
            return false;
        };
        if instr.op.is_protected() {
            return false;
        }
        match instr.defines() {
            Some(name) => !self.is_live_after(name, position),
            None => false,
        }
    }
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
    fn test_def_use_sites() {
        // x = 2; t1 = x + 3; y = t1; PRINT y
        let code = lower("x = 2; y = x + 3; print(y);");
        let du = DefUse::compute(&code);
        assert_eq!(du.defs_of("x"), &[0]);
        assert_eq!(du.uses_of("x"), &[1]);
        assert_eq!(du.defs_of("t1"), &[1]);
        assert_eq!(du.uses_of("y"), &[3]);
        assert!(du.uses_of("missing").is_empty());
        assert!(du.used_after("x", 0));
        assert!(!du.used_after("x", 1));
        assert!(du.defined_before("y", 3));
    }

    #[test]
    fn test_labels_are_not_uses() {
        let code = lower("while (c) { print(1); }");
        let du = DefUse::compute(&code);
        assert!(du.uses_of("L1").is_empty());
        assert!(du.uses_of("L2").is_empty());
    }

    #[test]
    fn test_unused_definition_is_dead() {
        let code = lower("a = 1; print(2);");
        let facts = CodeFacts::compute(&code);
        assert!(facts.is_dead(&code, 0));
        assert!(!facts.is_dead(&code, 1));
    }

    #[test]
    fn test_loop_carried_update_is_live() {
        // i = t2 is the last write to i; its only reads come earlier in the loop
        let code = lower("i = 0; while (i < 3) { i += 1; }");
        let facts = CodeFacts::compute(&code);
        let update = code
            .iter()
            .rposition(|instr| instr.defines() == Some("i"))
            .unwrap();
        assert!(!facts.def_use.used_after("i", update));
        assert!(facts.is_live_after("i", update));
        assert!(!facts.is_dead(&code, update));
    }

    #[test]
    fn test_protected_ops_never_dead() {
        let code = lower("scan(n);");
        let facts = CodeFacts::compute(&code);
        assert!(!facts.is_dead(&code, 0));
        assert!(!facts.is_dead(&code, 5));
    }
}
