use std::cell::Cell;
use std::time::{Duration, SystemTime};

/// Source of wall-clock time for the timer and the day number
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to. Used to drive the engine through day rollovers and
/// timer checks deterministically.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<SystemTime>,
}

impl ManualClock {
    pub fn new(now: SystemTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: SystemTime) {
        self.now.set(now);
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}
