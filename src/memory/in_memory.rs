use tracing::trace;

use super::{MemoryStore, Slot};
use crate::error::MemoryResult;

/// Process-local memory: two cells, gone when the process exits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryStore {
    one: Option<f64>,
    two: Option<f64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget both slots
    pub fn clear(&mut self) {
        self.one = None;
        self.two = None;
    }

    fn cell(&self, slot: Slot) -> &Option<f64> {
        match slot {
            Slot::One => &self.one,
            Slot::Two => &self.two,
        }
    }

    fn cell_mut(&mut self, slot: Slot) -> &mut Option<f64> {
        match slot {
            Slot::One => &mut self.one,
            Slot::Two => &mut self.two,
        }
    }
}

impl MemoryStore for InMemoryStore {
    fn save(&mut self, slot: Slot, value: f64) -> MemoryResult<()> {
        trace!(%slot, slot_id = slot.id(), value, "in-memory save");
        *self.cell_mut(slot) = Some(value);
        Ok(())
    }

    fn load(&self, slot: Slot) -> MemoryResult<Option<f64>> {
        Ok(*self.cell(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_reports_not_found() {
        let store = InMemoryStore::new();
        assert_eq!(store.load(Slot::One).unwrap(), None);
        assert_eq!(store.load(Slot::Two).unwrap(), None);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut store = InMemoryStore::new();
        store.save(Slot::One, 8.0).unwrap();
        assert_eq!(store.load(Slot::One).unwrap(), Some(8.0));
        assert_eq!(store.load(Slot::Two).unwrap(), None);

        store.save(Slot::Two, -1.5).unwrap();
        store.save(Slot::One, 9.0).unwrap();
        assert_eq!(store.load(Slot::One).unwrap(), Some(9.0));
        assert_eq!(store.load(Slot::Two).unwrap(), Some(-1.5));
    }

    #[test]
    fn test_clear() {
        let mut store = InMemoryStore::new();
        store.save(Slot::One, 1.0).unwrap();
        store.save(Slot::Two, 2.0).unwrap();
        store.clear();
        assert_eq!(store, InMemoryStore::default());
    }
}
