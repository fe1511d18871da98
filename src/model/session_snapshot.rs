use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DurationSeconds;
use std::time::Duration;

use super::{AttemptRecord, Slots, MAX_ATTEMPTS};

/// Everything needed to resume one difficulty's game for the day it was started on.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub day_number: i64,
    #[serde(default)]
    pub slots: Slots,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub history: Vec<AttemptRecord>,
    #[serde(default)]
    pub best_score: usize,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default, rename = "elapsedSeconds")]
    pub elapsed: Duration,
}

impl SessionSnapshot {
    pub fn belongs_to(&self, day_number: i64) -> bool {
        self.day_number == day_number
    }

    /// Structural checks for data that came back from storage. A snapshot that fails these
    /// is treated as if nothing had been saved.
    pub fn is_consistent(&self) -> bool {
        let history_matches = self.history.len() == self.attempts as usize
            && self
                .history
                .iter()
                .zip((1..=self.attempts).rev())
                .all(|(record, expected)| record.is_well_formed() && record.attempt == expected);
        let best_matches = self.best_score
            == self
                .history
                .iter()
                .map(|record| record.correct_count)
                .max()
                .unwrap_or(0);
        let unfinished =
            self.attempts < MAX_ATTEMPTS && !self.history.iter().any(|r| r.is_solved());

        self.slots.is_consistent() && history_matches && best_matches && unfinished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sequence;

    fn snapshot_with_history(records: Vec<AttemptRecord>) -> SessionSnapshot {
        SessionSnapshot {
            day_number: 7,
            slots: Slots::default(),
            attempts: records.len() as u32,
            best_score: records.iter().map(|r| r.correct_count).max().unwrap_or(0),
            history: records,
            elapsed: Duration::from_secs(12),
        }
    }

    #[test]
    fn test_json_round_trip_uses_elapsed_seconds() {
        let guess = Sequence::new([1, 2, 3, 4, 5]).unwrap();
        let snapshot = snapshot_with_history(vec![AttemptRecord::new(1, 2, guess)]);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["elapsedSeconds"], 12);
        assert_eq!(json["dayNumber"], 7);
        assert_eq!(json["bestScore"], 2);

        let parsed: SessionSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: SessionSnapshot = serde_json::from_str(r#"{"dayNumber": 3}"#).unwrap();
        assert_eq!(parsed.attempts, 0);
        assert!(parsed.history.is_empty());
        assert_eq!(parsed.elapsed, Duration::ZERO);
        assert!(parsed.is_consistent());
    }

    #[test]
    fn test_consistency_checks() {
        let first = Sequence::new([1, 2, 3, 4, 5]).unwrap();
        let second = Sequence::new([2, 1, 3, 4, 5]).unwrap();

        let valid = snapshot_with_history(vec![
            AttemptRecord::new(2, 3, second),
            AttemptRecord::new(1, 1, first),
        ]);
        assert!(valid.is_consistent());

        let mut wrong_order = valid.clone();
        wrong_order.history.reverse();
        assert!(!wrong_order.is_consistent());

        let mut wrong_count = valid.clone();
        wrong_count.attempts = 5;
        assert!(!wrong_count.is_consistent());

        let mut wrong_best = valid.clone();
        wrong_best.best_score = 4;
        assert!(!wrong_best.is_consistent());

        let solved = snapshot_with_history(vec![AttemptRecord::new(1, 5, first)]);
        assert!(!solved.is_consistent());
    }
}
