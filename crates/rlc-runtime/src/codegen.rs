//! Target code generation.
//!
//! Generated programs are rendered straight from the checked AST, not from
//! the optimized IR: the IR is an inspection artifact and structured
//! control flow maps one-to-one onto the target's `while`/`if`.

use rlc_engine::ast::{
    AssignOperator, BinaryOperator, Expression, Program, Statement, UnaryOperator,
};

/// Renders a checked program as source text for a host interpreter.
pub trait CodeGenerator: Send + Sync {
    /// Target language name, for diagnostics
    fn language(&self) -> &'static str;

    /// Render the whole program
    fn generate(&self, program: &Program) -> String;
}

/// Standalone Python 3 program that reads `scan` input from stdin, one
/// value per line.
const PYTHON_PRELUDE: &[&str] = &[
    "# Generated by rlc",
    "import sys",
    "",
    "_input_values = sys.stdin.read().splitlines()",
    "_input_index = 0",
    "",
    "def _scan():",
    "    global _input_index",
    "    if _input_index < len(_input_values):",
    "        raw = _input_values[_input_index]",
    "        _input_index += 1",
    "    else:",
    "        raw = '0'",
    "    try:",
    "        return float(raw)",
    "    except ValueError:",
    "        return 0.0",
    "",
    "def _print(value):",
    "    if isinstance(value, float) and value.is_integer():",
    "        value = int(value)",
    "    print(value)",
    "",
    "# Main execution",
];

/// Python 3 code generator.
///
/// Variables are prefixed with `v_` so that source names never collide with
/// Python keywords, builtins or the prelude helpers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonGenerator;

impl PythonGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for PythonGenerator {
    fn language(&self) -> &'static str {
        "python"
    }

    fn generate(&self, program: &Program) -> String {
        let mut out = PythonEmitter::default();
        for line in PYTHON_PRELUDE {
            out.lines.push((*line).to_string());
        }
        out.block(&program.statements);
        let mut text = out.lines.join("\n");
        text.push('\n');
        text
    }
}

#[derive(Default)]
struct PythonEmitter {
    lines: Vec<String>,
    indent: usize,
}

impl PythonEmitter {
    fn emit(&mut self, line: String) {
        self.lines.push(format!("{}{}", "    ".repeat(self.indent), line));
    }

    /// Indented body; Python needs at least one statement.
    fn body(&mut self, statements: &[Statement]) {
        self.indent += 1;
        if statements.is_empty() {
            self.emit("pass".to_string());
        } else {
            self.block(statements);
        }
        self.indent -= 1;
    }

    fn block(&mut self, statements: &[Statement]) {
        for stmt in statements {
            self.statement(stmt);
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Assignment(s) => {
                let op = match s.operator {
                    AssignOperator::Assign => "=",
                    AssignOperator::AddAssign => "+=",
                    AssignOperator::SubtractAssign => "-=",
                };
                let value = expression(&s.value);
                self.emit(format!("{} {} {}", variable(&s.target), op, value));
            }
            Statement::Print(s) => {
                self.emit(format!("_print({})", expression(&s.expression)));
            }
            Statement::Scan(s) => {
                self.emit(format!("{} = _scan()", variable(&s.target)));
            }
            Statement::While(s) => {
                self.emit(format!("while {}:", expression(&s.condition)));
                self.body(&s.body);
            }
            Statement::If(s) => {
                self.emit(format!("if {}:", expression(&s.condition)));
                self.body(&s.then_body);
                if let Some(else_body) = &s.else_body {
                    self.emit("else:".to_string());
                    self.body(else_body);
                }
            }
        }
    }
}

fn variable(name: &str) -> String {
    format!("v_{}", name)
}

fn expression(expr: &Expression) -> String {
    match expr {
        // `{:?}` always keeps a fractional part or exponent, so the value
        // stays a Python float
        Expression::NumberLiteral(n) => format!("{:?}", n.value),
        Expression::StringLiteral(s) => format!("\"{}\"", s.value),
        Expression::Identifier(id) => variable(&id.name),
        Expression::Binary(e) => {
            let op = match e.operator {
                BinaryOperator::And => "and",
                BinaryOperator::Or => "or",
                other => other.as_str(),
            };
            format!("({} {} {})", expression(&e.left), op, expression(&e.right))
        }
        Expression::Unary(e) => match e.operator {
            UnaryOperator::Not => format!("(not {})", expression(&e.operand)),
            UnaryOperator::Minus => format!("(-{})", expression(&e.operand)),
        },
    }
}
