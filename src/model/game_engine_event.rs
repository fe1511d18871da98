use super::{AttemptRecord, Difficulty, GameResult, Slots, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    AwaitingInput,
    ReadyToSubmit,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineEvent {
    GameStarted {
        difficulty: Difficulty,
        day_number: i64,
        resumed: bool,
    },
    SlotsUpdated(Slots),
    SubmissionReadyChanged(bool),
    AttemptRecorded(AttemptRecord),
    HistoryVisibilityChanged(bool),
    ThemeChanged(Theme),
    DarkModeChanged(bool),
    TimerTicked(u64),
    GameCompleted(GameResult),
}
