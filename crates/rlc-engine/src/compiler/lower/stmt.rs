//! Statement lowering

use super::Lowerer;
use crate::compiler::ir::{Instruction, Operand};
use crate::parser::ast::{
    AssignmentStatement, IfStatement, Statement, WhileStatement,
};

impl Lowerer {
    pub(super) fn lower_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Assignment(assign) => self.lower_assignment(assign),
            Statement::Print(print) => {
                let value = self.lower_expression(&print.expression);
                self.emit(Instruction::print(value));
            }
            Statement::Scan(scan) => self.emit(Instruction::scan(&scan.target)),
            Statement::While(while_stmt) => self.lower_while(while_stmt),
            Statement::If(if_stmt) => self.lower_if(if_stmt),
        }
    }

    fn lower_block(&mut self, body: &[Statement]) {
        for stmt in body {
            self.lower_statement(stmt);
        }
    }

    fn lower_assignment(&mut self, assign: &AssignmentStatement) {
        let value = self.lower_expression(&assign.value);
        match assign.operator.binary_operator() {
            None => self.emit(Instruction::assign(value, &assign.target)),
            Some(op) => {
                // x += v  =>  tN = x + v; x = tN
                let temp = self.new_temp();
                self.emit(Instruction::binary(
                    op.into(),
                    Operand::name(&assign.target),
                    value,
                    temp.clone(),
                ));
                self.emit(Instruction::assign(Operand::Name(temp), &assign.target));
            }
        }
    }

    fn lower_while(&mut self, stmt: &WhileStatement) {
        let start = self.new_label();
        let end = self.new_label();

        self.emit(Instruction::label(start.clone()));
        let condition = self.lower_expression(&stmt.condition);
        self.emit(Instruction::if_false(condition, end.clone()));
        self.lower_block(&stmt.body);
        self.emit(Instruction::goto(start));
        self.emit(Instruction::label(end));
    }

    fn lower_if(&mut self, stmt: &IfStatement) {
        let else_label = self.new_label();
        let end_label = self.new_label();

        let condition = self.lower_expression(&stmt.condition);
        self.emit(Instruction::if_false(condition, else_label.clone()));
        self.lower_block(&stmt.then_body);

        match &stmt.else_body {
            Some(else_body) => {
                self.emit(Instruction::goto(end_label.clone()));
                self.emit(Instruction::label(else_label));
                self.lower_block(else_body);
                self.emit(Instruction::label(end_label));
            }
            None => self.emit(Instruction::label(else_label)),
        }
    }
}
