//! Memory slot storage.
//!
//! The calculator talks to storage only through [`MemoryStore`]. Two
//! implementations ship with the crate:
//!
//! - [`InMemoryStore`]: process-local cells
//! - [`JsonFileStore`]: a JSON document on disk, surviving restarts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MemoryResult;

pub mod file;
pub mod in_memory;

pub use file::JsonFileStore;
pub use in_memory::InMemoryStore;

/// One of the two fixed memory locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    /// Numeric slot id (1 or 2)
    pub fn id(&self) -> u8 {
        match self {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::One => "one",
            Slot::Two => "two",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one" | "1" | "m1" => Ok(Slot::One),
            "two" | "2" | "m2" => Ok(Slot::Two),
            other => Err(format!(
                "unknown memory slot '{other}' (expected one, two, m1 or m2)"
            )),
        }
    }
}

/// Storage capability the calculator saves results into.
///
/// `load` returns `Ok(None)` when a slot has never been saved. Every other
/// failure is an `Err` and is passed through by the calculator untouched.
pub trait MemoryStore {
    /// Persist `value` into `slot`, replacing whatever was there
    fn save(&mut self, slot: Slot, value: f64) -> MemoryResult<()>;

    /// Fetch the value last saved into `slot`
    fn load(&self, slot: Slot) -> MemoryResult<Option<f64>>;
}

impl<S: MemoryStore + ?Sized> MemoryStore for &mut S {
    fn save(&mut self, slot: Slot, value: f64) -> MemoryResult<()> {
        (**self).save(slot, value)
    }

    fn load(&self, slot: Slot) -> MemoryResult<Option<f64>> {
        (**self).load(slot)
    }
}

impl<S: MemoryStore + ?Sized> MemoryStore for Box<S> {
    fn save(&mut self, slot: Slot, value: f64) -> MemoryResult<()> {
        (**self).save(slot, value)
    }

    fn load(&self, slot: Slot) -> MemoryResult<Option<f64>> {
        (**self).load(slot)
    }
}
