use tracing::debug;

use crate::command::Operation;
use crate::error::{CalculatorError, Result};
use crate::memory::{MemoryStore, Slot};

/// Four-operation calculator remembering its last result.
///
/// The memory store is borrowed, not owned: the caller keeps the store and can
/// swap it with [`Calculator::set_memory`] between operations.
pub struct Calculator<'m> {
    result: Option<f64>,
    memory: &'m mut dyn MemoryStore,
}

impl<'m> Calculator<'m> {
    pub fn new(memory: &'m mut dyn MemoryStore) -> Self {
        Self {
            result: None,
            memory,
        }
    }

    /// Replace the memory store used by later saves and loads
    pub fn set_memory(&mut self, memory: &'m mut dyn MemoryStore) -> &mut Self {
        self.memory = memory;
        self
    }

    pub fn get_memory(&self) -> &dyn MemoryStore {
        &*self.memory
    }

    /// Result of the last arithmetic operation, if any has run
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn add(&mut self, a: f64, b: f64) -> f64 {
        self.store_result(a + b)
    }

    pub fn sub(&mut self, a: f64, b: f64) -> f64 {
        self.store_result(a - b)
    }

    pub fn mult(&mut self, a: f64, b: f64) -> f64 {
        self.store_result(a * b)
    }

    /// Divide `a` by `b`. A zero divisor yields positive infinity.
    pub fn div(&mut self, a: f64, b: f64) -> f64 {
        if b == 0.0 {
            debug!(a, "division by zero, returning infinity");
            return self.store_result(f64::INFINITY);
        }

        self.store_result(a / b)
    }

    /// Run `operation` on `a` and `b`
    pub fn apply(&mut self, operation: Operation, a: f64, b: f64) -> f64 {
        match operation {
            Operation::Add => self.add(a, b),
            Operation::Sub => self.sub(a, b),
            Operation::Mult => self.mult(a, b),
            Operation::Div => self.div(a, b),
        }
    }

    pub fn save_m1(&mut self) -> Result<&mut Self> {
        self.save(Slot::One)
    }

    pub fn save_m2(&mut self) -> Result<&mut Self> {
        self.save(Slot::Two)
    }

    pub fn load_m1(&self) -> Result<f64> {
        self.load(Slot::One)
    }

    pub fn load_m2(&self) -> Result<f64> {
        self.load(Slot::Two)
    }

    /// Save the current result into `slot`.
    ///
    /// Fails with [`CalculatorError::NoResult`] before any arithmetic
    /// operation; the store is not touched in that case.
    pub fn save(&mut self, slot: Slot) -> Result<&mut Self> {
        self.save_result(slot)?;
        Ok(self)
    }

    /// Like [`Calculator::save`], returning the value that was written
    pub fn save_result(&mut self, slot: Slot) -> Result<f64> {
        let value = self.result.ok_or(CalculatorError::NoResult)?;
        self.memory.save(slot, value)?;
        debug!(%slot, slot_id = slot.id(), value, "result saved to memory");

        Ok(value)
    }

    /// Load the value held in `slot`. An empty slot reads as zero.
    pub fn load(&self, slot: Slot) -> Result<f64> {
        match self.memory.load(slot)? {
            Some(value) => Ok(value),
            None => {
                debug!(%slot, "memory slot is empty, using 0");
                Ok(0.0)
            }
        }
    }

    fn store_result(&mut self, value: f64) -> f64 {
        self.result = Some(value);
        value
    }
}
