//! Operations, operands and the line format understood by sessions.

use std::fmt;
use std::str::FromStr;

use crate::calculator::Calculator;
use crate::error::{CalculatorError, Result};
use crate::memory::Slot;

/// The four binary operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mult,
    Div,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mult => "mult",
            Operation::Div => "div",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "+" | "plus" => Ok(Operation::Add),
            "sub" | "-" | "minus" => Ok(Operation::Sub),
            "mult" | "mul" | "*" | "times" => Ok(Operation::Mult),
            "div" | "/" => Ok(Operation::Div),
            other => Err(format!("unknown operation '{other}'")),
        }
    }
}

/// An argument to an operation: a literal or a memory reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Number(f64),
    Memory(Slot),
}

impl Operand {
    /// Resolve to a number, reading memory through `calculator`
    pub fn resolve(&self, calculator: &Calculator<'_>) -> Result<f64> {
        match self {
            Operand::Number(value) => Ok(*value),
            Operand::Memory(slot) => calculator.load(*slot),
        }
    }
}

impl FromStr for Operand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        match lowered.as_str() {
            "m1" => return Ok(Operand::Memory(Slot::One)),
            "m2" => return Ok(Operand::Memory(Slot::Two)),
            _ => {}
        }

        s.parse::<f64>()
            .map(Operand::Number)
            .map_err(|_| format!("'{s}' is neither a number nor a memory reference (m1, m2)"))
    }
}

/// One instruction of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Calculate {
        operation: Operation,
        lhs: Operand,
        rhs: Operand,
    },
    Save(Slot),
    Load(Slot),
    ShowResult,
}

/// Parse a single session line.
///
/// Returns `Ok(None)` for blank lines and `#` comments. `line_no` is 1-based
/// and only used for error reporting.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let keyword = words[0].to_lowercase();
    let invalid = |message: String| CalculatorError::invalid_command(line_no, message);

    let command = match (keyword.as_str(), &words[1..]) {
        ("save", [slot]) => Command::Save(slot.parse().map_err(invalid)?),
        ("load", [slot]) => Command::Load(slot.parse().map_err(invalid)?),
        ("save" | "load", _) => return Err(invalid(format!("'{keyword}' takes one slot"))),
        ("result", []) => Command::ShowResult,
        (op, [lhs, rhs]) => Command::Calculate {
            operation: op.parse().map_err(invalid)?,
            lhs: lhs.parse().map_err(invalid)?,
            rhs: rhs.parse().map_err(invalid)?,
        },
        _ => return Err(invalid(format!("cannot understand '{line}'"))),
    };

    Ok(Some(command))
}
