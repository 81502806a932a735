//! Expression lowering

use super::Lowerer;
use crate::compiler::ir::{Instruction, Operand};
use crate::parser::ast::Expression;

impl Lowerer {
    /// Lower an expression, returning the operand that holds its value.
    ///
    /// Literals and identifiers produce no code; every operator produces
    /// exactly one instruction into a fresh temporary.
    pub(super) fn lower_expression(&mut self, expr: &Expression) -> Operand {
        match expr {
            Expression::NumberLiteral(lit) => Operand::Number(lit.value),
            Expression::StringLiteral(lit) => Operand::Str(lit.value.clone()),
            Expression::Identifier(id) => Operand::name(&id.name),
            Expression::Binary(bin) => {
                let left = self.lower_expression(&bin.left);
                let right = self.lower_expression(&bin.right);
                let dest = self.new_temp();
                self.emit(Instruction::binary(bin.operator.into(), left, right, dest.clone()));
                Operand::Name(dest)
            }
            Expression::Unary(unary) => {
                let operand = self.lower_expression(&unary.operand);
                let dest = self.new_temp();
                self.emit(Instruction::unary(unary.operator.into(), operand, dest.clone()));
                Operand::Name(dest)
            }
        }
    }
}
