use std::io::Write;

use clap::ValueEnum;
use serde_json::{json, Value};

use crate::command::Operation;
use crate::error::Result;
use crate::memory::Slot;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Plain values, one per line
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// What a single command produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Calculated {
        operation: Operation,
        a: f64,
        b: f64,
        result: f64,
    },
    Saved {
        slot: Slot,
        value: f64,
    },
    Loaded {
        slot: Slot,
        value: f64,
    },
    Current {
        result: Option<f64>,
    },
    Cleared,
}

impl Outcome {
    /// Human readable rendering
    pub fn to_text(&self) -> String {
        match self {
            Outcome::Calculated { result, .. } => format_number(*result),
            Outcome::Saved { slot, value } => {
                format!("saved {} to slot {slot}", format_number(*value))
            }
            Outcome::Loaded { value, .. } => format_number(*value),
            Outcome::Current { result: Some(value) } => format_number(*value),
            Outcome::Current { result: None } => "no result".to_string(),
            Outcome::Cleared => "memory cleared".to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Outcome::Calculated {
                operation,
                a,
                b,
                result,
            } => json!({
                "kind": "calculated",
                "operation": operation.as_str(),
                "a": json_number(*a),
                "b": json_number(*b),
                "result": json_number(*result),
            }),
            Outcome::Saved { slot, value } => json!({
                "kind": "saved",
                "slot": slot.as_str(),
                "value": json_number(*value),
            }),
            Outcome::Loaded { slot, value } => json!({
                "kind": "loaded",
                "slot": slot.as_str(),
                "value": json_number(*value),
            }),
            Outcome::Current { result } => json!({
                "kind": "result",
                "result": result.map(json_number),
            }),
            Outcome::Cleared => json!({ "kind": "cleared" }),
        }
    }
}

/// Writes outcomes in the configured format
pub struct OutputManager<W: Write> {
    format: OutputFormat,
    writer: W,
}

impl<W: Write> OutputManager<W> {
    pub fn new(format: OutputFormat, writer: W) -> Self {
        Self { format, writer }
    }

    pub fn emit(&mut self, outcome: &Outcome) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{}", outcome.to_text())?,
            OutputFormat::Json => writeln!(self.writer, "{}", outcome.to_json())?,
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Format a number the way the calculator prints it: `8`, `0.25`, `inf`
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        value.to_string()
    }
}

/// JSON has no infinity, so non-finite values become strings
fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(format_number(value)))
}
