//! AST to IR Lowering
//!
//! Converts a validated AST into linear three-address code. Temporaries
//! are named `t<N>` and labels `L<N>`; both counters start at 1 and are
//! local to one `lower_program` call, so two lowerings of the same program
//! produce identical code.

mod expr;
mod stmt;

use crate::compiler::ir::Instruction;
use crate::parser::ast::Program;

/// AST to IR lowerer
#[derive(Debug, Default)]
pub struct Lowerer {
    /// Instructions emitted so far
    code: Vec<Instruction>,
    /// Next temporary number
    next_temp: u32,
    /// Next label number
    next_label: u32,
}

impl Lowerer {
    /// Create a new lowerer
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a whole program
    pub fn lower_program(&mut self, program: &Program) -> Vec<Instruction> {
        self.code = Vec::new();
        self.next_temp = 1;
        self.next_label = 1;

        for stmt in &program.statements {
            self.lower_statement(stmt);
        }

        std::mem::take(&mut self.code)
    }

    /// Allocate a fresh temporary name
    fn new_temp(&mut self) -> String {
        let name = format!("t{}", self.next_temp);
        self.next_temp += 1;
        name
    }

    /// Allocate a fresh label name
    fn new_label(&mut self) -> String {
        let name = format!("L{}", self.next_label);
        self.next_label += 1;
        name
    }

    fn emit(&mut self, instr: Instruction) {
        self.code.push(instr);
    }
}

/// Lower a program with a fresh lowerer.
pub fn generate(program: &Program) -> Vec<Instruction> {
    Lowerer::new().lower_program(program)
}
