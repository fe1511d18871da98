use serde::{Deserialize, Serialize};

use super::{Sequence, SEQUENCE_LENGTH};

pub const MAX_ATTEMPTS: u32 = 12;

/// One submitted guess. History is kept most-recent-first.
#[readonly::make]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    /// 1-based
    pub attempt: u32,
    pub correct_count: usize,
    pub guess: Sequence,
}

impl AttemptRecord {
    pub fn new(attempt: u32, correct_count: usize, guess: Sequence) -> Self {
        Self {
            attempt,
            correct_count,
            guess,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        (1..=MAX_ATTEMPTS).contains(&self.attempt) && self.correct_count <= SEQUENCE_LENGTH
    }

    pub fn is_solved(&self) -> bool {
        self.correct_count == SEQUENCE_LENGTH
    }
}
