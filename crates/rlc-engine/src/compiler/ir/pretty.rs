//! Pretty-printing for IR
//!
//! Provides the one-line-per-instruction listing used in reports and logs.

use super::instr::{Instruction, Opcode};
use std::fmt::Write;

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Instruction {
    fn pretty_print(&self) -> String {
        self.to_string()
    }
}

impl PrettyPrint for [Instruction] {
    /// Numbered listing; labels are flush left, everything else indented.
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        let width = self.len().to_string().len();
        for (index, instr) in self.iter().enumerate() {
            let indent = if instr.op == Opcode::Label { "" } else { "    " };
            let _ = writeln!(output, "{:>width$}  {}{}", index, indent, instr, width = width);
        }
        output
    }
}

/// Render each instruction as one line of text.
pub fn render_listing(code: &[Instruction]) -> Vec<String> {
    code.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ir::Operand;

    #[test]
    fn test_render_listing() {
        let code = vec![
            Instruction::label("L1"),
            Instruction::print(Operand::Number(1.0)),
            Instruction::goto("L1"),
        ];
        assert_eq!(render_listing(&code), vec!["L1:", "PRINT 1", "GOTO L1"]);
    }

    #[test]
    fn test_pretty_print_indents_body() {
        let code = vec![
            Instruction::label("L1"),
            Instruction::print(Operand::name("x")),
        ];
        let text = code.pretty_print();
        assert_eq!(text, "0  L1:\n1      PRINT x\n");
    }
}
