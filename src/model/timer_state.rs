use std::time::{Duration, SystemTime};

/// Wall-clock game timer. Elapsed time is always recomputed as `now - started_at` on top of
/// the time carried over from a saved session, so missed or late ticks never drift it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerState {
    pub started_at: Option<SystemTime>,
    pub base_elapsed: Duration,
    pub stopped_at: Option<SystemTime>,
}

impl TimerState {
    /// A stopped timer that resumes counting from `elapsed_seconds`
    pub fn restored(elapsed_seconds: u64) -> TimerState {
        TimerState {
            base_elapsed: Duration::from_secs(elapsed_seconds),
            ..Default::default()
        }
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    pub fn elapsed(&self, now: SystemTime) -> Duration {
        match self.started_at {
            Some(started_at) => {
                let until_time = self.stopped_at.unwrap_or(now);
                self.base_elapsed.saturating_add(
                    until_time
                        .duration_since(started_at)
                        .unwrap_or(Duration::default()),
                )
            }
            None => self.base_elapsed,
        }
    }

    pub fn elapsed_seconds(&self, now: SystemTime) -> u64 {
        self.elapsed(now).as_secs()
    }

    /// Starting an already started timer keeps its original start time
    pub fn started(&self, now: SystemTime) -> TimerState {
        let mut new_state = self.clone();
        if new_state.started_at.is_none() {
            new_state.started_at = Some(now);
        }
        new_state
    }

    pub fn stopped(&self, now: SystemTime) -> TimerState {
        let mut new_state = self.clone();
        if new_state.is_running() {
            new_state.stopped_at = Some(now);
        }
        new_state
    }
}

/// `m:ss`, the format used in share text
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
