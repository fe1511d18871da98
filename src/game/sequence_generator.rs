use chrono::{DateTime, NaiveDate, Utc};
use log::trace;
use std::time::SystemTime;

use crate::model::{Difficulty, Sequence, SYMBOLS};

/// Day 1 is this UTC calendar date. Changing it renumbers every puzzle and orphans saved games.
pub const EPOCH_DATE: (i32, u32, u32) = (2026, 1, 21);

const LCG_MULTIPLIER: i64 = 9301;
const LCG_INCREMENT: i64 = 49297;
const LCG_MODULUS: i64 = 233280;

pub fn epoch_date() -> NaiveDate {
    let (year, month, day) = EPOCH_DATE;
    NaiveDate::from_ymd_opt(year, month, day).expect("epoch date is a valid calendar date")
}

/// Puzzle number for the UTC calendar day containing `now`. Days before the epoch yield zero
/// or negative numbers.
pub fn day_number(now: SystemTime) -> i64 {
    let today = DateTime::<Utc>::from(now).date_naive();
    today.signed_duration_since(epoch_date()).num_days() + 1
}

pub fn seed_for(day_number: i64, difficulty: Difficulty) -> i64 {
    day_number
        .wrapping_mul(1000)
        .wrapping_add(difficulty.seed_offset())
}

/// Linear congruential stream yielding values in [0, 1)
struct SeededRandom {
    state: i64,
}

impl SeededRandom {
    fn new(seed: i64) -> Self {
        Self {
            state: seed.rem_euclid(LCG_MODULUS),
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT).rem_euclid(LCG_MODULUS);
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Uniform index in `0..=max`
    fn next_index(&mut self, max: usize) -> usize {
        (self.next_f64() * (max + 1) as f64).floor() as usize
    }
}

/// The hidden sequence for a given puzzle day and difficulty. Pure: the same inputs always
/// give the same permutation.
pub fn generate(day_number: i64, difficulty: Difficulty) -> Sequence {
    let mut values = SYMBOLS;
    let mut rng = SeededRandom::new(seed_for(day_number, difficulty));

    // Fisher-Yates, last index down to 1
    for i in (1..values.len()).rev() {
        let j = rng.next_index(i);
        values.swap(i, j);
    }
    trace!(
        target: "sequence_generator",
        "Day {} {:?}: {:?}",
        day_number,
        difficulty,
        values
    );

    // a swap-only shuffle of SYMBOLS is always a permutation
    Sequence::new(values).expect("shuffle preserves the permutation")
}
