use log::warn;
use std::path::PathBuf;

use super::persistence::{Persistence, StorageError};
use crate::model::{Difficulty, Theme};

pub const DATA_DIR_ENV: &str = "SEQUENCELE_DATA_DIR";
pub const DAY_ENV: &str = "SEQUENCELE_DAY";

/// User preferences. Each field is stored under its own key so a corrupt value only resets
/// that one preference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    pub difficulty: Difficulty,
    pub dark_mode: bool,
}

impl Settings {
    pub fn load(persistence: &Persistence) -> Self {
        Settings {
            theme: persistence.load_theme(),
            difficulty: persistence.load_difficulty(),
            dark_mode: persistence.load_dark_mode(),
        }
    }

    pub fn save(&self, persistence: &mut Persistence) -> Result<(), StorageError> {
        persistence.save_theme(self.theme)?;
        persistence.save_difficulty(self.difficulty)?;
        persistence.save_dark_mode(self.dark_mode)
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// Puzzle day to play instead of today's
    pub fn day_override_from_env() -> Option<i64> {
        let value = std::env::var(DAY_ENV).ok()?;
        match value.trim().parse::<i64>() {
            Ok(day) => Some(day),
            Err(e) => {
                warn!(target: "settings", "Ignoring {}={:?}: {}", DAY_ENV, value, e);
                None
            }
        }
    }

    /// `$SEQUENCELE_DATA_DIR`, else `sequencele` under the platform's local data directory
    pub fn data_dir() -> Option<PathBuf> {
        match std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => Some(PathBuf::from(dir)),
            None => dirs::data_local_dir().map(|dir| dir.join("sequencele")),
        }
    }
}
