use std::cell::RefCell;
use std::collections::VecDeque;

use memcalc::{Calculator, CalculatorError, MemoryError, MemoryResult, MemoryStore, Slot};

/// Store that records every save and replays scripted load answers in order
#[derive(Default)]
struct RecordingStore {
    saves: Vec<(Slot, f64)>,
    loads: RefCell<Vec<Slot>>,
    answers: RefCell<VecDeque<MemoryResult<Option<f64>>>>,
}

impl RecordingStore {
    fn answering<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = MemoryResult<Option<f64>>>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            ..Default::default()
        }
    }
}

impl MemoryStore for RecordingStore {
    fn save(&mut self, slot: Slot, value: f64) -> MemoryResult<()> {
        self.saves.push((slot, value));
        Ok(())
    }

    fn load(&self, slot: Slot) -> MemoryResult<Option<f64>> {
        self.loads.borrow_mut().push(slot);
        self.answers.borrow_mut().pop_front().unwrap_or(Ok(None))
    }
}

#[test]
fn test_basic_operations() {
    let mut store = RecordingStore::default();
    let mut calc = Calculator::new(&mut store);

    assert_eq!(calc.add(5.0, 5.0), 10.0);
    assert_eq!(calc.add(5.0, -5.0), 0.0);
    assert_eq!(calc.sub(10.0, 5.0), 5.0);
    assert_eq!(calc.mult(3.0, 2.0), 6.0);
    assert_eq!(calc.div(16.0, 2.0), 8.0);
    assert_eq!(calc.div(10.0, 0.0), f64::INFINITY);
}

#[test]
fn test_operations_match_native_arithmetic() {
    let mut store = RecordingStore::default();
    let mut calc = Calculator::new(&mut store);
    let values = [-7.5, -1.0, 0.0, 0.1, 2.0, 3.0, 1e9];

    for &a in &values {
        for &b in &values {
            assert_eq!(calc.add(a, b), a + b);
            assert_eq!(calc.sub(a, b), a - b);
            assert_eq!(calc.mult(a, b), a * b);
            if b == 0.0 {
                assert_eq!(calc.div(a, b), f64::INFINITY);
            } else {
                assert_eq!(calc.div(a, b), a / b);
            }
        }
    }
}

#[test]
fn test_empty_slots_read_as_zero() {
    let mut store = RecordingStore::default();
    {
        let calc = Calculator::new(&mut store);
        assert_eq!(calc.load_m1().unwrap(), 0.0);
        assert_eq!(calc.load_m2().unwrap(), 0.0);
    }
    assert_eq!(*store.loads.borrow(), vec![Slot::One, Slot::Two]);
}

#[test]
fn test_simple_save_memory() {
    let mut store = RecordingStore::answering([Ok(Some(8.0))]);
    {
        let mut calc = Calculator::new(&mut store);
        calc.add(4.0, 4.0);
        calc.save_m1().unwrap();
        assert_eq!(calc.load_m1().unwrap(), 8.0);
    }

    assert_eq!(store.saves, vec![(Slot::One, 8.0)]);
    assert_eq!(*store.loads.borrow(), vec![Slot::One]);
}

#[test]
fn test_two_memory_slots() {
    let mut store = RecordingStore::answering([Ok(Some(8.0)), Ok(Some(2.0))]);
    {
        let mut calc = Calculator::new(&mut store);
        calc.add(4.0, 4.0);
        calc.save_m1().unwrap();
        calc.div(10.0, 5.0);
        calc.save_m2().unwrap();

        assert_eq!(calc.load_m1().unwrap(), 8.0);
        assert_eq!(calc.load_m2().unwrap(), 2.0);
    }

    assert_eq!(store.saves, vec![(Slot::One, 8.0), (Slot::Two, 2.0)]);
}

#[test]
fn test_memory_usage() {
    let mut store = RecordingStore::answering([Ok(Some(200.0)), Ok(Some(10.0))]);
    {
        let mut calc = Calculator::new(&mut store);
        calc.sub(20.0, 10.0);
        calc.save_m1().unwrap();
        calc.mult(20.0, 10.0);
        calc.save_m2().unwrap();

        let m1 = calc.load_m1().unwrap();
        let m2 = calc.load_m2().unwrap();
        assert_eq!(calc.add(m1, m2), 210.0);
    }

    assert_eq!(store.saves, vec![(Slot::One, 10.0), (Slot::Two, 200.0)]);
}

#[test]
fn test_save_to_memory_with_empty_result_fails() {
    let mut store = RecordingStore::default();
    {
        let mut calc = Calculator::new(&mut store);
        let err = calc.save_m1().err().unwrap();
        assert!(matches!(err, CalculatorError::NoResult));
        assert_eq!(err.to_string(), "Can't store to memory: no result found");
    }
    assert!(store.saves.is_empty());
}

#[test]
fn test_load_failure_is_not_swallowed() {
    let mut store = RecordingStore::answering([Err(MemoryError::backend(Slot::Two, "timeout"))]);
    let calc = Calculator::new(&mut store);

    match calc.load_m2() {
        Err(CalculatorError::Memory(MemoryError::Backend { slot, message })) => {
            assert_eq!(slot, Slot::Two);
            assert_eq!(message, "timeout");
        }
        other => panic!("Expected backend error, got {other:?}"),
    }
}

#[test]
fn test_set_memory_redirects_saves_and_loads() {
    let mut first = RecordingStore::default();
    let mut second = RecordingStore::answering([Ok(Some(99.0))]);
    {
        let mut calc = Calculator::new(&mut first);
        calc.add(1.0, 1.0);
        calc.save_m1().unwrap();

        calc.set_memory(&mut second).mult(3.0, 3.0);
        calc.save_m2().unwrap();
        assert_eq!(calc.load_m1().unwrap(), 99.0);
    }

    assert_eq!(first.saves, vec![(Slot::One, 2.0)]);
    assert!(first.loads.borrow().is_empty());
    assert_eq!(second.saves, vec![(Slot::Two, 9.0)]);
    assert_eq!(*second.loads.borrow(), vec![Slot::One]);
}
