//! Memory Calculator Library
//!
//! A four-operation calculator that remembers its last result and can save it
//! into one of two memory slots. Storage is pluggable through the
//! [`MemoryStore`] trait.
//!
//! # Quick Start
//!
//! ```
//! use memcalc::{Calculator, InMemoryStore};
//!
//! let mut store = InMemoryStore::new();
//! let mut calc = Calculator::new(&mut store);
//!
//! calc.add(4.0, 4.0);
//! calc.save_m1()?;
//! assert_eq!(calc.load_m1()?, 8.0);
//! assert_eq!(calc.div(1.0, 0.0), f64::INFINITY);
//! # Ok::<(), memcalc::CalculatorError>(())
//! ```
//!
//! # Library Components
//!
//! - **Calculator**: arithmetic and memory slot access
//! - **Memory**: the store trait plus in-process and JSON file stores
//! - **Session**: line-oriented command interpreter
//! - **CLI**: command-line interface definitions
//! - **Error**: error types

use std::fs::File;
use std::io::{self, BufReader, Write};

use tracing::info;

pub mod calculator;
pub mod cli;
pub mod command;
pub mod error;
pub mod logging;
pub mod memory;
pub mod output;
pub mod session;

// Re-export main types for convenience
pub use calculator::Calculator;
pub use cli::{Action, CliArgs, OperandArgs};
pub use command::{parse_line, Command, Operand, Operation};
pub use error::{CalculatorError, MemoryError, MemoryResult, Result};
pub use memory::{InMemoryStore, JsonFileStore, MemoryStore, Slot};
pub use output::{OutputFormat, OutputManager, Outcome};
pub use session::Session;

/// Main entry point for the command-line tool, printing to stdout
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use memcalc::{run, CliArgs};
///
/// let args = CliArgs::parse_from(["memcalc", "add", "4", "4", "--save", "one"]);
/// run(args).expect("calculation failed");
/// ```
pub fn run(args: CliArgs) -> Result<()> {
    let stdout = io::stdout();
    run_with_writer(args, stdout.lock())
}

/// Run the command described by `args`, writing outcomes to `writer`
///
/// Validates the arguments, opens the configured memory store and executes
/// the action against a fresh calculator.
pub fn run_with_writer<W: Write>(args: CliArgs, writer: W) -> Result<()> {
    args.validate()?;

    let mut output = OutputManager::new(args.output, writer);

    if args.ephemeral {
        let mut store = InMemoryStore::new();
        return execute(&args, &mut store, &mut output);
    }

    let mut store = JsonFileStore::open(&args.memory_file)?;
    execute(&args, &mut store, &mut output)
}

/// Stores the `clear` action can empty
trait ClearableStore: MemoryStore {
    fn clear_slots(&mut self) -> MemoryResult<()>;
}

impl ClearableStore for InMemoryStore {
    fn clear_slots(&mut self) -> MemoryResult<()> {
        self.clear();
        Ok(())
    }
}

impl ClearableStore for JsonFileStore {
    fn clear_slots(&mut self) -> MemoryResult<()> {
        self.clear()?;
        info!(path = %self.path().display(), "memory cleared");
        Ok(())
    }
}

fn execute<S, W>(args: &CliArgs, store: &mut S, output: &mut OutputManager<W>) -> Result<()>
where
    S: ClearableStore,
    W: Write,
{
    match &args.action {
        Action::Add(operands) => calculate(Operation::Add, operands, store, output),
        Action::Sub(operands) => calculate(Operation::Sub, operands, store, output),
        Action::Mult(operands) => calculate(Operation::Mult, operands, store, output),
        Action::Div(operands) => calculate(Operation::Div, operands, store, output),
        Action::Load { slot } => {
            let calculator = Calculator::new(store);
            output.emit(&Outcome::Loaded {
                slot: *slot,
                value: calculator.load(*slot)?,
            })
        }
        Action::Clear => {
            store.clear_slots()?;
            output.emit(&Outcome::Cleared)
        }
        Action::Session { .. } => {
            let mut session = Session::new(Calculator::new(store));
            match args.session_script() {
                Some(path) => {
                    let file = File::open(path)?;
                    session.run(BufReader::new(file), |outcome| output.emit(outcome))?;
                }
                None => {
                    let stdin = io::stdin();
                    session.run(stdin.lock(), |outcome| output.emit(outcome))?;
                }
            }
            Ok(())
        }
    }
}

fn calculate<W: Write>(
    operation: Operation,
    operands: &OperandArgs,
    store: &mut dyn MemoryStore,
    output: &mut OutputManager<W>,
) -> Result<()> {
    let mut calculator = Calculator::new(store);

    let a = operands.a.resolve(&calculator)?;
    let b = operands.b.resolve(&calculator)?;
    let result = calculator.apply(operation, a, b);
    output.emit(&Outcome::Calculated {
        operation,
        a,
        b,
        result,
    })?;

    if let Some(slot) = operands.save {
        let value = calculator.save_result(slot)?;
        output.emit(&Outcome::Saved { slot, value })?;
    }
    Ok(())
}
