//! Line-oriented interpreter driving one calculator over many commands.
//!
//! ```text
//! sub 20 10
//! save m1
//! mult 20 10
//! save m2
//! add m1 m2      # 210
//! ```

use std::io::BufRead;

use tracing::{debug, info};

use crate::calculator::Calculator;
use crate::command::{parse_line, Command};
use crate::error::Result;
use crate::output::Outcome;

pub struct Session<'m> {
    calculator: Calculator<'m>,
    executed: usize,
}

impl<'m> Session<'m> {
    pub fn new(calculator: Calculator<'m>) -> Self {
        Self {
            calculator,
            executed: 0,
        }
    }

    pub fn calculator(&self) -> &Calculator<'m> {
        &self.calculator
    }

    /// Number of commands executed so far (blank lines and comments excluded)
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Apply a single command
    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::Calculate {
                operation,
                lhs,
                rhs,
            } => {
                let a = lhs.resolve(&self.calculator)?;
                let b = rhs.resolve(&self.calculator)?;
                let result = self.calculator.apply(operation, a, b);
                Outcome::Calculated {
                    operation,
                    a,
                    b,
                    result,
                }
            }
            Command::Save(slot) => Outcome::Saved {
                slot,
                value: self.calculator.save_result(slot)?,
            },
            Command::Load(slot) => Outcome::Loaded {
                slot,
                value: self.calculator.load(slot)?,
            },
            Command::ShowResult => Outcome::Current {
                result: self.calculator.result(),
            },
        };

        self.executed += 1;
        debug!(?command, "command executed");
        Ok(outcome)
    }

    /// Parse and apply one line; `None` for blank lines and comments
    pub fn execute_line(&mut self, line_no: usize, line: &str) -> Result<Option<Outcome>> {
        match parse_line(line_no, line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    /// Run every line of `reader`, handing each outcome to `emit`.
    ///
    /// Stops at the first failing line and returns its error.
    pub fn run<R, F>(&mut self, reader: R, mut emit: F) -> Result<usize>
    where
        R: BufRead,
        F: FnMut(&Outcome) -> Result<()>,
    {
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(outcome) = self.execute_line(index + 1, &line)? {
                emit(&outcome)?;
            }
        }

        info!(commands = self.executed, "session finished");
        Ok(self.executed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Operation;
    use crate::error::CalculatorError;
    use crate::memory::{InMemoryStore, MemoryStore, Slot};
    use std::io::Cursor;

    fn run_script(store: &mut InMemoryStore, script: &str) -> Result<Vec<Outcome>> {
        let mut session = Session::new(Calculator::new(store));
        let mut outcomes = Vec::new();
        session.run(Cursor::new(script), |outcome| {
            outcomes.push(outcome.clone());
            Ok(())
        })?;
        Ok(outcomes)
    }

    #[test]
    fn test_memory_usage_script() {
        let mut store = InMemoryStore::new();
        let outcomes = run_script(
            &mut store,
            "sub 20 10\nsave m1\n\n# second value\nmult 20 10\nsave m2\nadd m1 m2\n",
        )
        .unwrap();

        assert_eq!(outcomes.len(), 5);
        assert_eq!(
            outcomes.last(),
            Some(&Outcome::Calculated {
                operation: Operation::Add,
                a: 10.0,
                b: 200.0,
                result: 210.0,
            })
        );
        assert_eq!(store.load(Slot::One).unwrap(), Some(10.0));
        assert_eq!(store.load(Slot::Two).unwrap(), Some(200.0));
    }

    #[test]
    fn test_save_before_result_stops_session() {
        let mut store = InMemoryStore::new();
        let err = run_script(&mut store, "result\nsave one\nadd 1 1\n").unwrap_err();

        assert!(matches!(err, CalculatorError::NoResult));
        assert_eq!(store, InMemoryStore::default());
    }

    #[test]
    fn test_invalid_line_reports_position() {
        let mut store = InMemoryStore::new();
        let err = run_script(&mut store, "add 1 1\n\nfrobnicate\n").unwrap_err();

        assert!(matches!(err, CalculatorError::InvalidCommand { line: 3, .. }));
    }

    #[test]
    fn test_result_and_load_outcomes() {
        let mut store = InMemoryStore::new();
        let mut session = Session::new(Calculator::new(&mut store));

        assert_eq!(
            session.execute(Command::ShowResult).unwrap(),
            Outcome::Current { result: None }
        );
        assert_eq!(
            session.execute(Command::Load(Slot::Two)).unwrap(),
            Outcome::Loaded {
                slot: Slot::Two,
                value: 0.0
            }
        );
        session.execute_line(1, "div 1 0").unwrap();
        assert_eq!(session.calculator().result(), Some(f64::INFINITY));
        assert_eq!(session.executed(), 3);
        assert_eq!(session.execute_line(2, "# nothing").unwrap(), None);
        assert_eq!(session.executed(), 3);
    }
}
