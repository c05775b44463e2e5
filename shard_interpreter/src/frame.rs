//! Call frames

use crate::error::RuntimeError;
use crate::value::{Pointer, Value};
use shard_ir::ValueId;

/// The per-call binding table from IR values to runtime values, plus the
/// frame-local allocation arena. Dropped wholesale when the call unwinds.
#[derive(Debug)]
pub struct Frame {
    bindings: Vec<Option<Value>>,
    arena: Vec<Option<Value>>,
}

impl Frame {
    /// A frame for a function with `value_count` virtual values.
    pub fn new(value_count: usize) -> Self {
        Self {
            bindings: vec![None; value_count],
            arena: Vec::new(),
        }
    }

    pub fn bind(&mut self, id: ValueId, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .bindings
            .get_mut(id.0 as usize)
            .ok_or(RuntimeError::UndefinedValue)?;
        *slot = Some(value);
        Ok(())
    }

    pub fn get(&self, id: ValueId) -> Result<Value, RuntimeError> {
        self.bindings
            .get(id.0 as usize)
            .copied()
            .flatten()
            .ok_or(RuntimeError::UndefinedValue)
    }

    /// Reserve `count` uninitialized slots and return a pointer to the first.
    pub fn alloc(&mut self, count: u32) -> Pointer {
        let slot = self.arena.len();
        self.arena.resize(slot + count as usize, None);
        Pointer { slot }
    }

    pub fn store(&mut self, pointer: Pointer, index: u32, value: Value) -> Result<(), RuntimeError> {
        let slot = self
            .arena
            .get_mut(pointer.slot + index as usize)
            .ok_or(RuntimeError::InvalidAccess)?;
        *slot = Some(value);
        Ok(())
    }

    pub fn load(&self, pointer: Pointer, index: u32) -> Result<Value, RuntimeError> {
        self.arena
            .get(pointer.slot + index as usize)
            .ok_or(RuntimeError::InvalidAccess)?
            .ok_or(RuntimeError::UninitializedRead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_are_per_value() {
        let mut frame = Frame::new(2);
        assert_eq!(frame.get(ValueId(0)), Err(RuntimeError::UndefinedValue));

        frame.bind(ValueId(0), Value::Int32(3)).unwrap();
        assert_eq!(frame.get(ValueId(0)), Ok(Value::Int32(3)));
        assert_eq!(frame.get(ValueId(1)), Err(RuntimeError::UndefinedValue));
        assert_eq!(frame.bind(ValueId(5), Value::Int32(0)), Err(RuntimeError::UndefinedValue));
    }

    #[test]
    fn arena_store_and_load() {
        let mut frame = Frame::new(0);
        let ptr = frame.alloc(4);

        assert_eq!(frame.load(ptr, 0), Err(RuntimeError::UninitializedRead));

        frame.store(ptr, 2, Value::Int8(9)).unwrap();
        assert_eq!(frame.load(ptr, 2), Ok(Value::Int8(9)));

        assert_eq!(
            frame.store(ptr, 4, Value::Int8(0)),
            Err(RuntimeError::InvalidAccess)
        );
    }

    #[test]
    fn allocations_do_not_overlap() {
        let mut frame = Frame::new(0);
        let a = frame.alloc(1);
        let b = frame.alloc(1);

        frame.store(a, 0, Value::Int32(1)).unwrap();
        frame.store(b, 0, Value::Int32(2)).unwrap();
        assert_eq!(frame.load(a, 0), Ok(Value::Int32(1)));
        assert_eq!(frame.load(b, 0), Ok(Value::Int32(2)));
    }
}
