use crate::helpers::Capitalize;
use crate::model::{format_elapsed, Difficulty, Theme, MAX_ATTEMPTS, SEQUENCE_LENGTH};

pub const GAME_TITLE: &str = "Sequencele";
pub const SHARE_URL: &str = "https://sequencele.pages.dev/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSummary {
    pub day_number: i64,
    pub difficulty: Difficulty,
    pub theme: Theme,
    pub attempts: u32,
    pub best_score: usize,
    pub elapsed_seconds: u64,
}

impl ShareSummary {
    /// Plain-text block for the clipboard
    pub fn to_text(&self) -> String {
        format!(
            "{title} #{day}\n\n\
             {difficulty} - {theme}\n\
             Attempts: {attempts}/{max_attempts}\n\
             Best Score: {best}/{length}\n\
             Time: {time}\n\n\
             {url}",
            title = GAME_TITLE,
            day = self.day_number,
            difficulty = self.difficulty.key().capitalize(),
            theme = self.theme.display_name(),
            attempts = self.attempts,
            max_attempts = MAX_ATTEMPTS,
            best = self.best_score,
            length = SEQUENCE_LENGTH,
            time = format_elapsed(self.elapsed_seconds),
            url = SHARE_URL,
        )
    }
}
