use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::command::Operand;
use crate::error::CalculatorError;
use crate::logging;
use crate::memory::file::DEFAULT_MEMORY_FILE;
use crate::memory::Slot;
use crate::output::OutputFormat;

/// CLI arguments for the calculator
#[derive(Parser, Debug)]
#[command(name = "memcalc")]
#[command(about = "Four-operation calculator with two memory slots")]
#[command(version)]
#[command(
    long_about = "Adds, subtracts, multiplies and divides two numbers, remembering the last result. Results can be saved to memory slot one or two and read back later, either within a session or across invocations through a JSON memory file."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub action: Action,

    /// Memory file shared between invocations
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "MEMCALC_MEMORY_FILE",
        default_value = DEFAULT_MEMORY_FILE,
        help = "Path of the JSON file holding the memory slots"
    )]
    pub memory_file: PathBuf,

    /// Keep memory in-process only
    #[arg(
        long,
        global = true,
        help = "Do not read or write the memory file; memory lasts for this run only"
    )]
    pub ephemeral: bool,

    /// Output format selection
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help = "Choose output format")]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true, help = "Show debug information on stderr")]
    pub verbose: bool,

    /// Log filter directives
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        env = "MEMCALC_LOG",
        help = "Log level or filter (e.g. warn, debug, memcalc::memory=trace)"
    )]
    pub log_level: Option<String>,
}

/// What to do in this invocation
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Add two operands
    Add(OperandArgs),
    /// Subtract the second operand from the first
    Sub(OperandArgs),
    /// Multiply two operands
    Mult(OperandArgs),
    /// Divide the first operand by the second (zero divisor gives inf)
    Div(OperandArgs),
    /// Print the value held in a memory slot (0 when empty)
    Load {
        #[arg(value_name = "SLOT")]
        slot: Slot,
    },
    /// Empty both memory slots
    Clear,
    /// Run commands line by line from a file or stdin
    Session {
        #[arg(value_name = "FILE", help = "Script to run; '-' or omitted reads stdin")]
        file: Option<PathBuf>,
    },
}

/// Operands shared by the arithmetic subcommands
#[derive(Args, Debug, Clone, PartialEq)]
pub struct OperandArgs {
    /// First operand: a number, m1 or m2
    #[arg(value_name = "A", allow_hyphen_values = true)]
    pub a: Operand,

    /// Second operand: a number, m1 or m2
    #[arg(value_name = "B", allow_hyphen_values = true)]
    pub b: Operand,

    /// Save the result into a memory slot
    #[arg(long, value_name = "SLOT")]
    pub save: Option<Slot>,
}

impl CliArgs {
    /// Validate CLI arguments and return meaningful errors
    pub fn validate(&self) -> Result<(), CalculatorError> {
        if let Some(ref level) = self.log_level {
            logging::validate_directives(level).map_err(CalculatorError::validation_error)?;
        }

        if !self.ephemeral && self.memory_file.is_dir() {
            return Err(CalculatorError::validation_error(format!(
                "Memory file is a directory: {}",
                self.memory_file.display()
            )));
        }

        if let Action::Session { file: Some(ref path) } = self.action {
            if !is_stdin(path) && !path.is_file() {
                return Err(CalculatorError::validation_error(format!(
                    "Session script not found: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Filter directives for the logger: `--verbose` beats `--log-level`
    pub fn log_directives(&self) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string())
        }
    }

    /// Script path for `session`, `None` meaning stdin
    pub fn session_script(&self) -> Option<&PathBuf> {
        match &self.action {
            Action::Session { file: Some(path) } if !is_stdin(path) => Some(path),
            _ => None,
        }
    }
}

fn is_stdin(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}
