use super::{Difficulty, Theme};

/// Actions the presentation layer sends into the engine. Slot indices are 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineCommand {
    PlaceInSlot(usize, u8),
    RemoveFromSlot(usize),
    Submit,
    ChangeDifficulty(Difficulty),
    ChangeTheme(Theme),
    SetDarkMode(bool),
    StartClock,
    Tick,
}
