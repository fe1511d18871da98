use crate::model::Difficulty;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const DISTRIBUTION_RANGES: [&str; 6] = ["1-2", "3-4", "5-6", "7-8", "9-10", "11-12"];

/// Outcome of one finished game, handed to the statistics and to the share text.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct GameResult {
    pub playthrough_id: Uuid,
    pub difficulty: Difficulty,
    pub day_number: i64,
    pub won: bool,
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Winning attempt counts, bucketed in pairs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct GuessDistribution {
    #[serde(rename = "1-2", default)]
    pub one_to_two: u32,
    #[serde(rename = "3-4", default)]
    pub three_to_four: u32,
    #[serde(rename = "5-6", default)]
    pub five_to_six: u32,
    #[serde(rename = "7-8", default)]
    pub seven_to_eight: u32,
    #[serde(rename = "9-10", default)]
    pub nine_to_ten: u32,
    #[serde(rename = "11-12", default)]
    pub eleven_to_twelve: u32,
}

impl GuessDistribution {
    /// Index into [`DISTRIBUTION_RANGES`] for a winning attempt count. Anything above 10 lands
    /// in the last bucket.
    pub fn bucket_index(attempts: u32) -> usize {
        match attempts {
            0..=2 => 0,
            3..=4 => 1,
            5..=6 => 2,
            7..=8 => 3,
            9..=10 => 4,
            _ => 5,
        }
    }

    pub fn record(&mut self, attempts: u32) {
        let bucket = match Self::bucket_index(attempts) {
            0 => &mut self.one_to_two,
            1 => &mut self.three_to_four,
            2 => &mut self.five_to_six,
            3 => &mut self.seven_to_eight,
            4 => &mut self.nine_to_ten,
            _ => &mut self.eleven_to_twelve,
        };
        *bucket += 1;
    }

    pub fn counts(&self) -> [u32; 6] {
        [
            self.one_to_two,
            self.three_to_four,
            self.five_to_six,
            self.seven_to_eight,
            self.nine_to_ten,
            self.eleven_to_twelve,
        ]
    }

    /// (label, count) pairs in display order
    pub fn buckets(&self) -> impl Iterator<Item = (&'static str, u32)> {
        DISTRIBUTION_RANGES.into_iter().zip(self.counts())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct LifetimeStats {
    pub played: u32,
    pub won: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub guess_distribution: GuessDistribution,
    /// `day-<N>` of the last counted game
    pub last_played_date: Option<String>,
}

impl LifetimeStats {
    pub fn day_key(day_number: i64) -> String {
        format!("day-{}", day_number)
    }

    pub fn was_played_on(&self, day_number: i64) -> bool {
        self.last_played_date.as_deref() == Some(Self::day_key(day_number).as_str())
    }

    pub fn last_played_day(&self) -> Option<i64> {
        self.last_played_date
            .as_deref()
            .and_then(|key| key.strip_prefix("day-"))
            .and_then(|n| n.parse().ok())
    }

    /// Whether the counters could have been produced by recording games. Streaks only count
    /// wins and every win lands in exactly one distribution bucket.
    pub fn is_consistent(&self) -> bool {
        let distributed: u32 = self.guess_distribution.counts().iter().sum();
        self.won <= self.played
            && self.current_streak <= self.max_streak
            && self.max_streak <= self.won
            && distributed == self.won
            && (self.played == 0 || self.last_played_day().is_some())
    }

    /// Rounded percentage of played games that were won
    pub fn win_rate(&self) -> u32 {
        if self.played == 0 {
            return 0;
        }
        (self.won as f64 / self.played as f64 * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let expected = [
            (1, 0),
            (2, 0),
            (3, 1),
            (4, 1),
            (5, 2),
            (6, 2),
            (7, 3),
            (8, 3),
            (9, 4),
            (10, 4),
            (11, 5),
            (12, 5),
        ];
        for (attempts, bucket) in expected {
            assert_eq!(
                GuessDistribution::bucket_index(attempts),
                bucket,
                "attempts {}",
                attempts
            );
        }
    }

    #[test]
    fn test_distribution_serializes_as_labelled_map() {
        let mut distribution = GuessDistribution::default();
        distribution.record(4);
        distribution.record(12);
        let json = serde_json::to_value(distribution).unwrap();
        assert_eq!(json["3-4"], 1);
        assert_eq!(json["11-12"], 1);
        assert_eq!(json["1-2"], 0);
        assert_eq!(
            distribution.buckets().collect::<Vec<_>>()[1],
            ("3-4", 1)
        );
    }

    #[test]
    fn test_win_rate() {
        let mut stats = LifetimeStats::default();
        assert_eq!(stats.win_rate(), 0);
        stats.played = 3;
        stats.won = 2;
        assert_eq!(stats.win_rate(), 67);
        stats.played = 8;
        stats.won = 1;
        assert_eq!(stats.win_rate(), 13);
    }

    #[test]
    fn test_day_key() {
        let stats = LifetimeStats {
            last_played_date: Some(LifetimeStats::day_key(42)),
            ..Default::default()
        };
        assert!(stats.was_played_on(42));
        assert!(!stats.was_played_on(43));
        assert_eq!(stats.last_played_day(), Some(42));
    }

    #[test]
    fn test_consistency() {
        let mut stats = LifetimeStats::default();
        assert!(stats.is_consistent());

        stats.played = 3;
        stats.won = 2;
        stats.current_streak = 1;
        stats.max_streak = 2;
        stats.guess_distribution.record(2);
        stats.guess_distribution.record(9);
        stats.last_played_date = Some(LifetimeStats::day_key(5));
        assert!(stats.is_consistent());

        let mut too_many_wins = stats.clone();
        too_many_wins.won = 4;
        assert!(!too_many_wins.is_consistent());

        let mut streak_above_max = stats.clone();
        streak_above_max.current_streak = 3;
        assert!(!streak_above_max.is_consistent());

        let mut missing_bucket = stats.clone();
        missing_bucket.guess_distribution = GuessDistribution::default();
        assert!(!missing_bucket.is_consistent());

        let mut no_day = stats;
        no_day.last_played_date = Some("yesterday".to_string());
        assert!(!no_day.is_consistent());
    }

    #[test]
    fn test_positional_array_is_inconsistent() {
        let stats: LifetimeStats = serde_json::from_str("[1,2,3]").unwrap();
        assert!(!stats.is_consistent());
    }

    #[test]
    fn test_reads_original_record_shape() {
        let json = r#"{
            "played": 4, "won": 3, "currentStreak": 2, "maxStreak": 3,
            "guessDistribution": {"1-2": 0, "3-4": 1, "5-6": 2, "7-8": 0, "9-10": 0, "11-12": 0},
            "lastPlayedDate": "day-9"
        }"#;
        let stats: LifetimeStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.guess_distribution.five_to_six, 2);
        assert_eq!(stats.last_played_day(), Some(9));
        assert_eq!(stats.win_rate(), 75);
    }
}
