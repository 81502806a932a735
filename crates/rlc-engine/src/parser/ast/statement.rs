//! Statement AST nodes

use super::*;

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statement {
    /// Assignment: x = e; x += e; x -= e;
    #[serde(rename = "AssignmentStatement")]
    Assignment(AssignmentStatement),

    /// print(e);
    #[serde(rename = "PrintStatement")]
    Print(PrintStatement),

    /// scan(x);
    #[serde(rename = "ScanStatement")]
    Scan(ScanStatement),

    /// while (c) { ... }
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),

    /// if (c) { ... } else { ... }
    #[serde(rename = "IfStatement")]
    If(IfStatement),
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::Assignment(s) => &s.span,
            Statement::Print(s) => &s.span,
            Statement::Scan(s) => &s.span,
            Statement::While(s) => &s.span,
            Statement::If(s) => &s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStatement {
    /// Name of the assigned variable
    pub target: String,
    pub operator: AssignOperator,
    pub value: Expression,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssignOperator {
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = "+=")]
    AddAssign,
    #[serde(rename = "-=")]
    SubtractAssign,
}

impl AssignOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOperator::Assign => "=",
            AssignOperator::AddAssign => "+=",
            AssignOperator::SubtractAssign => "-=",
        }
    }

    /// The binary operator a compound assignment applies, if any.
    pub fn binary_operator(&self) -> Option<BinaryOperator> {
        match self {
            AssignOperator::Assign => None,
            AssignOperator::AddAssign => Some(BinaryOperator::Add),
            AssignOperator::SubtractAssign => Some(BinaryOperator::Subtract),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintStatement {
    pub expression: Expression,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanStatement {
    pub target: String,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_body: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub else_body: Option<Vec<Statement>>,
    #[serde(skip)]
    pub span: Span,
}
