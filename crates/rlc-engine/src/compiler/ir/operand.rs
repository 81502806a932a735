//! IR operands

use std::fmt;

/// An instruction operand.
///
/// Only `Name` operands refer to storage (temporaries `tN` or user
/// variables) and count as use sites; literals and labels do not.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Numeric literal
    Number(f64),
    /// String literal (raw text, rendered quoted)
    Str(String),
    /// Temporary or user variable
    Name(String),
    /// Jump target
    Label(String),
}

impl Operand {
    /// Create a name operand
    pub fn name(name: impl Into<String>) -> Self {
        Operand::Name(name.into())
    }

    /// Create a label operand
    pub fn label(label: impl Into<String>) -> Self {
        Operand::Label(label.into())
    }

    /// True for number and string literals
    pub fn is_constant(&self) -> bool {
        matches!(self, Operand::Number(_) | Operand::Str(_))
    }

    /// The numeric value of a number literal
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The referenced name, if this operand reads storage
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    /// The label text, if this operand is a jump target
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Operand::Label(l) => Some(l),
            _ => None,
        }
    }
}

/// Render a number without a trailing fractional part when it is integral.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{}", format_number(*n)),
            Operand::Str(s) => write!(f, "\"{}\"", s),
            Operand::Name(n) => write!(f, "{}", n),
            Operand::Label(l) => write!(f, "{}", l),
        }
    }
}
