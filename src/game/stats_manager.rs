use log::{info, trace};

use super::persistence::{Persistence, StorageError};
use crate::model::{GameResult, LifetimeStats};

/// Folds finished games into the lifetime record. At most one game per puzzle day counts.
#[derive(Debug, Clone, Default)]
pub struct StatsManager {
    stats: LifetimeStats,
}

impl StatsManager {
    pub fn load(persistence: &Persistence) -> Self {
        Self {
            stats: persistence.load_statistics(),
        }
    }

    pub fn stats(&self) -> &LifetimeStats {
        &self.stats
    }

    pub fn win_rate(&self) -> u32 {
        self.stats.win_rate()
    }

    /// Returns whether the game was counted. A second completion on an already recorded day
    /// changes nothing and writes nothing.
    pub fn record_completion(&mut self, won: bool, attempts: u32, day_number: i64) -> bool {
        if self.stats.was_played_on(day_number) {
            trace!(target: "stats", "Day {} already recorded", day_number);
            return false;
        }

        let stats = &mut self.stats;
        stats.played += 1;
        if won {
            stats.won += 1;
            stats.current_streak += 1;
            stats.max_streak = stats.max_streak.max(stats.current_streak);
            stats.guess_distribution.record(attempts);
        } else {
            stats.current_streak = 0;
        }
        stats.last_played_date = Some(LifetimeStats::day_key(day_number));

        info!(
            target: "stats",
            "Recorded day {}: won={} attempts={} streak={}",
            day_number, won, attempts, stats.current_streak
        );
        true
    }

    pub fn record_game(
        &mut self,
        result: &GameResult,
        persistence: &mut Persistence,
    ) -> Result<bool, StorageError> {
        let counted = self.record_completion(result.won, result.attempts, result.day_number);
        if counted {
            persistence.save_statistics(&self.stats)?;
        }
        Ok(counted)
    }
}
