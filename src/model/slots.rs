use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{Sequence, SEQUENCE_LENGTH, SYMBOLS};

/// The five placement cells of the guess being built. A value sits in at most one cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Slots([Option<u8>; SEQUENCE_LENGTH]);

impl Slots {
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied().flatten()
    }

    pub fn cells(&self) -> &[Option<u8>; SEQUENCE_LENGTH] {
        &self.0
    }

    pub fn is_used(&self, value: u8) -> bool {
        self.0.contains(&Some(value))
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Values still in the pool, in canonical order
    pub fn available_values(&self) -> Vec<u8> {
        SYMBOLS.iter().copied().filter(|v| !self.is_used(*v)).collect()
    }

    /// Puts `value` into the cell at `index`, replacing whatever was there. Returns false and
    /// leaves the slots untouched when the index is out of range, the value is not a symbol,
    /// or the value already sits in some cell.
    pub fn place(&mut self, index: usize, value: u8) -> bool {
        if index >= SEQUENCE_LENGTH || !SYMBOLS.contains(&value) || self.is_used(value) {
            return false;
        }
        self.0[index] = Some(value);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<u8> {
        self.0.get_mut(index).and_then(Option::take)
    }

    pub fn clear(&mut self) {
        self.0 = [None; SEQUENCE_LENGTH];
    }

    /// True when every filled cell holds a symbol and no symbol repeats
    pub fn is_consistent(&self) -> bool {
        let mut filled = self.0.iter().flatten();
        filled.clone().all(|v| SYMBOLS.contains(v)) && filled.all_unique()
    }

    pub fn to_sequence(&self) -> Option<Sequence> {
        let mut values = [0u8; SEQUENCE_LENGTH];
        for (target, cell) in values.iter_mut().zip(self.0.iter()) {
            *target = (*cell)?;
        }
        Sequence::new(values)
    }
}
