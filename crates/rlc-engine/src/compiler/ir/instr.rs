//! Three-address code instructions

use super::operand::Operand;
use crate::parser::ast::{BinaryOperator, UnaryOperator};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,

    // Logical (eager)
    And,
    Or,
}

impl BinaryOp {
    /// Check if this is an arithmetic operator
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
    }

    /// Check if this is a comparison operator
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Greater
                | BinaryOp::Less
                | BinaryOp::GreaterEqual
                | BinaryOp::LessEqual
        )
    }

    /// Source-level symbol, used as the opcode text
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::Less => "<",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::LessEqual => "<=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl From<BinaryOperator> for BinaryOp {
    fn from(op: BinaryOperator) -> Self {
        match op {
            BinaryOperator::Add => BinaryOp::Add,
            BinaryOperator::Subtract => BinaryOp::Sub,
            BinaryOperator::Multiply => BinaryOp::Mul,
            BinaryOperator::Divide => BinaryOp::Div,
            BinaryOperator::Equal => BinaryOp::Equal,
            BinaryOperator::NotEqual => BinaryOp::NotEqual,
            BinaryOperator::GreaterThan => BinaryOp::Greater,
            BinaryOperator::LessThan => BinaryOp::Less,
            BinaryOperator::GreaterEqual => BinaryOp::GreaterEqual,
            BinaryOperator::LessEqual => BinaryOp::LessEqual,
            BinaryOperator::And => BinaryOp::And,
            BinaryOperator::Or => BinaryOp::Or,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

impl From<UnaryOperator> for UnaryOp {
    fn from(op: UnaryOperator) -> Self {
        match op {
            UnaryOperator::Not => UnaryOp::Not,
            UnaryOperator::Minus => UnaryOp::Neg,
        }
    }
}

/// Instruction operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// result = arg1
    Assign,
    /// PRINT arg1
    Print,
    /// SCAN result
    Scan,
    /// arg1:
    Label,
    /// GOTO arg1
    Goto,
    /// IF_FALSE arg1 GOTO arg2
    IfFalse,
    /// result = arg1 op arg2
    Binary(BinaryOp),
    /// result = op arg1
    Unary(UnaryOp),
    /// Annotation line; no runtime effect
    Comment,
}

impl Opcode {
    /// Opcode text as it appears in listings and policy state keys
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Assign => "ASSIGN",
            Opcode::Print => "PRINT",
            Opcode::Scan => "SCAN",
            Opcode::Label => "LABEL",
            Opcode::Goto => "GOTO",
            Opcode::IfFalse => "IF_FALSE",
            Opcode::Binary(op) => op.symbol(),
            Opcode::Unary(op) => op.symbol(),
            Opcode::Comment => "COMMENT",
        }
    }

    /// Opcodes that carry control flow
    pub fn is_control(&self) -> bool {
        matches!(self, Opcode::Label | Opcode::Goto | Opcode::IfFalse)
    }

    /// Opcodes dead-code elimination must never remove
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Opcode::Print
                | Opcode::Scan
                | Opcode::Label
                | Opcode::Goto
                | Opcode::IfFalse
                | Opcode::Comment
        )
    }

    /// Side-effect-free computations (safe to reuse or move)
    pub fn is_pure(&self) -> bool {
        matches!(self, Opcode::Assign | Opcode::Binary(_) | Opcode::Unary(_))
    }
}

/// A three-address instruction.
///
/// Every instruction except LABEL, GOTO, IF_FALSE, PRINT and COMMENT
/// carries a `result` naming the location it defines. Use the named
/// constructors to keep that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub op: Opcode,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub result: Option<String>,
}

impl Instruction {
    /// result = value
    pub fn assign(value: Operand, result: impl Into<String>) -> Self {
        Self {
            op: Opcode::Assign,
            arg1: Some(value),
            arg2: None,
            result: Some(result.into()),
        }
    }

    /// result = left op right
    pub fn binary(op: BinaryOp, left: Operand, right: Operand, result: impl Into<String>) -> Self {
        Self {
            op: Opcode::Binary(op),
            arg1: Some(left),
            arg2: Some(right),
            result: Some(result.into()),
        }
    }

    /// result = op operand
    pub fn unary(op: UnaryOp, operand: Operand, result: impl Into<String>) -> Self {
        Self {
            op: Opcode::Unary(op),
            arg1: Some(operand),
            arg2: None,
            result: Some(result.into()),
        }
    }

    pub fn print(value: Operand) -> Self {
        Self {
            op: Opcode::Print,
            arg1: Some(value),
            arg2: None,
            result: None,
        }
    }

    pub fn scan(target: impl Into<String>) -> Self {
        Self {
            op: Opcode::Scan,
            arg1: None,
            arg2: None,
            result: Some(target.into()),
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            op: Opcode::Label,
            arg1: Some(Operand::label(label)),
            arg2: None,
            result: None,
        }
    }

    pub fn goto(label: impl Into<String>) -> Self {
        Self {
            op: Opcode::Goto,
            arg1: Some(Operand::label(label)),
            arg2: None,
            result: None,
        }
    }

    pub fn if_false(condition: Operand, label: impl Into<String>) -> Self {
        Self {
            op: Opcode::IfFalse,
            arg1: Some(condition),
            arg2: Some(Operand::label(label)),
            result: None,
        }
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            op: Opcode::Comment,
            arg1: Some(Operand::Str(text.into())),
            arg2: None,
            result: None,
        }
    }

    /// Name of the location this instruction defines, if any
    pub fn defines(&self) -> Option<&str> {
        match self.op {
            Opcode::Assign | Opcode::Scan | Opcode::Binary(_) | Opcode::Unary(_) => {
                self.result.as_deref()
            }
            _ => None,
        }
    }

    /// Names this instruction reads
    pub fn uses(&self) -> impl Iterator<Item = &str> {
        self.arg1
            .iter()
            .chain(self.arg2.iter())
            .filter_map(Operand::as_name)
    }

    /// True if this instruction reads `name`
    pub fn reads(&self, name: &str) -> bool {
        self.uses().any(|used| used == name)
    }

    /// Label text for LABEL / GOTO, or the target of IF_FALSE
    pub fn jump_label(&self) -> Option<&str> {
        match self.op {
            Opcode::Label | Opcode::Goto => self.arg1.as_ref().and_then(Operand::as_label),
            Opcode::IfFalse => self.arg2.as_ref().and_then(Operand::as_label),
            _ => None,
        }
    }

    /// Text of a COMMENT instruction
    pub fn comment_text(&self) -> Option<&str> {
        match (&self.op, &self.arg1) {
            (Opcode::Comment, Some(Operand::Str(text))) => Some(text),
            _ => None,
        }
    }
}

fn opt(operand: &Option<Operand>) -> String {
    operand.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result.as_deref().unwrap_or("");
        match self.op {
            Opcode::Assign => write!(f, "{} = {}", result, opt(&self.arg1)),
            Opcode::Print => write!(f, "PRINT {}", opt(&self.arg1)),
            Opcode::Scan => write!(f, "SCAN {}", result),
            Opcode::Label => write!(f, "{}:", opt(&self.arg1)),
            Opcode::Goto => write!(f, "GOTO {}", opt(&self.arg1)),
            Opcode::IfFalse => write!(f, "IF_FALSE {} GOTO {}", opt(&self.arg1), opt(&self.arg2)),
            Opcode::Comment => write!(f, "; {}", self.comment_text().unwrap_or("")),
            Opcode::Unary(op) => write!(f, "{} = {} {}", result, op.symbol(), opt(&self.arg1)),
            Opcode::Binary(op) => write!(
                f,
                "{} = {} {} {}",
                result,
                opt(&self.arg1),
                op.symbol(),
                opt(&self.arg2)
            ),
        }
    }
}
