mod attempt_record;
mod difficulty;
mod game_engine_command;
mod game_engine_event;
mod game_stats;
mod sequence;
pub mod session_snapshot;
mod slots;
mod theme;
mod timer_state;

pub use attempt_record::{AttemptRecord, MAX_ATTEMPTS};
pub use difficulty::Difficulty;
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::{GameEngineEvent, GamePhase};
pub use game_stats::{GameResult, GuessDistribution, LifetimeStats, DISTRIBUTION_RANGES};
pub use sequence::{Sequence, SEQUENCE_LENGTH, SYMBOLS};
pub use session_snapshot::SessionSnapshot;
pub use slots::Slots;
pub use theme::Theme;
pub use timer_state::{format_elapsed, TimerState};
