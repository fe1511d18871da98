use log::{trace, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::{Difficulty, LifetimeStats, SessionSnapshot, Theme};

pub const THEME_KEY: &str = "sequencele-theme";
pub const DIFFICULTY_KEY: &str = "sequencele-difficulty";
pub const DARK_MODE_KEY: &str = "sequencele-dark-mode";
pub const STATS_KEY: &str = "sequencele-stats";
pub const GAME_STATE_KEY: &str = "sequencele-game-state";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable string storage under namespaced keys
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside `data_dir`
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process storage; nothing survives the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Raw per-difficulty entries. Each one is decoded on its own so a damaged entry cannot take
/// the other difficulties down with it.
type SessionStates = BTreeMap<String, serde_json::Value>;

/// Typed load/save of preferences, statistics and per-difficulty sessions. Loads never fail:
/// missing, unreadable or corrupt values come back as the documented default. Saves report
/// failures and leave it to the caller whether that matters.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let contents = match self.store.get(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                warn!(target: "persistence", "Could not read {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(target: "persistence", "Ignoring corrupt {}: {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let contents = serde_json::to_string(value)?;
        trace!(target: "persistence", "Saving {}: {}", key, contents);
        self.store.set(key, &contents)
    }

    pub fn load_theme(&self) -> Theme {
        self.load(THEME_KEY).unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.save(THEME_KEY, &theme)
    }

    pub fn load_difficulty(&self) -> Difficulty {
        self.load(DIFFICULTY_KEY).unwrap_or_default()
    }

    pub fn save_difficulty(&mut self, difficulty: Difficulty) -> Result<(), StorageError> {
        self.save(DIFFICULTY_KEY, &difficulty)
    }

    pub fn load_dark_mode(&self) -> bool {
        self.load(DARK_MODE_KEY).unwrap_or(false)
    }

    pub fn save_dark_mode(&mut self, dark_mode: bool) -> Result<(), StorageError> {
        self.save(DARK_MODE_KEY, &dark_mode)
    }

    pub fn load_statistics(&self) -> LifetimeStats {
        match self.load::<LifetimeStats>(STATS_KEY) {
            Some(stats) if stats.is_consistent() => stats,
            Some(stats) => {
                warn!(target: "persistence", "Ignoring inconsistent statistics: {:?}", stats);
                LifetimeStats::default()
            }
            None => LifetimeStats::default(),
        }
    }

    pub fn save_statistics(&mut self, stats: &LifetimeStats) -> Result<(), StorageError> {
        self.save(STATS_KEY, stats)
    }

    fn load_session_states(&self) -> SessionStates {
        self.load(GAME_STATE_KEY).unwrap_or_default()
    }

    fn decode_session(key: &str, entry: &serde_json::Value) -> Option<SessionSnapshot> {
        match SessionSnapshot::deserialize(entry) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(target: "persistence", "Ignoring corrupt {} session: {}", key, e);
                None
            }
        }
    }

    /// Drops entries that are not a known difficulty holding a readable session
    fn retain_readable(states: &mut SessionStates) {
        states.retain(|key, entry| {
            key.parse::<Difficulty>().is_ok() && Self::decode_session(key, entry).is_some()
        });
    }

    /// Whatever was saved for `difficulty`, stale or not. Day checks belong to the engine.
    pub fn load_session_state(&self, difficulty: Difficulty) -> Option<SessionSnapshot> {
        let states = self.load_session_states();
        let entry = states.get(difficulty.key())?;
        Self::decode_session(difficulty.key(), entry)
    }

    pub fn save_session_state(
        &mut self,
        difficulty: Difficulty,
        state: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let mut states = self.load_session_states();
        Self::retain_readable(&mut states);
        states.insert(difficulty.key().to_string(), serde_json::to_value(state)?);
        self.save(GAME_STATE_KEY, &states)
    }

    /// Removes one difficulty's entry, leaving the others intact
    pub fn clear_session_state(&mut self, difficulty: Difficulty) -> Result<(), StorageError> {
        let mut states = self.load_session_states();
        if states.remove(difficulty.key()).is_none() {
            return Ok(());
        }
        Self::retain_readable(&mut states);
        if states.is_empty() {
            return self.store.remove(GAME_STATE_KEY);
        }
        self.save(GAME_STATE_KEY, &states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttemptRecord, Sequence, Slots};
    use std::time::Duration;

    fn snapshot(day_number: i64) -> SessionSnapshot {
        let mut slots = Slots::default();
        slots.place(0, 3);
        SessionSnapshot {
            day_number,
            slots,
            attempts: 1,
            history: vec![AttemptRecord::new(
                1,
                2,
                Sequence::new([1, 2, 3, 4, 5]).unwrap(),
            )],
            best_score: 2,
            elapsed: Duration::from_secs(30),
        }
    }

    /// Store whose every operation fails, standing in for a broken disk
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("broken".to_string()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken".to_string()))
        }
        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("broken".to_string()))
        }
    }

    #[test]
    fn test_defaults_when_empty() {
        let persistence = Persistence::in_memory();
        assert_eq!(persistence.load_theme(), Theme::Number);
        assert_eq!(persistence.load_difficulty(), Difficulty::Normal);
        assert!(!persistence.load_dark_mode());
        assert_eq!(persistence.load_statistics(), LifetimeStats::default());
        assert_eq!(persistence.load_session_state(Difficulty::Hard), None);
    }

    #[test]
    fn test_preferences_round_trip() {
        let mut persistence = Persistence::in_memory();
        persistence.save_theme(Theme::Brainrot).unwrap();
        persistence.save_difficulty(Difficulty::Hard).unwrap();
        persistence.save_dark_mode(true).unwrap();
        assert_eq!(persistence.load_theme(), Theme::Brainrot);
        assert_eq!(persistence.load_difficulty(), Difficulty::Hard);
        assert!(persistence.load_dark_mode());
    }

    #[test]
    fn test_corrupt_values_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "\"sparkles\"").unwrap();
        store.set(DIFFICULTY_KEY, "not json").unwrap();
        store.set(STATS_KEY, "[1,2,3]").unwrap();
        store.set(GAME_STATE_KEY, "{\"normal\": 5}").unwrap();
        let persistence = Persistence::new(store);

        assert_eq!(persistence.load_theme(), Theme::Number);
        assert_eq!(persistence.load_difficulty(), Difficulty::Normal);
        assert_eq!(persistence.load_statistics(), LifetimeStats::default());
        assert_eq!(persistence.load_session_state(Difficulty::Normal), None);
    }

    #[test]
    fn test_inconsistent_statistics_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(
                STATS_KEY,
                r#"{"played": 2, "won": 5, "currentStreak": 5, "maxStreak": 5,
                    "lastPlayedDate": "day-3"}"#,
            )
            .unwrap();
        let mut persistence = Persistence::new(store);
        assert_eq!(persistence.load_statistics(), LifetimeStats::default());

        let mut stats = LifetimeStats::default();
        stats.played = 2;
        stats.won = 1;
        stats.current_streak = 1;
        stats.max_streak = 1;
        stats.guess_distribution.record(3);
        stats.last_played_date = Some(LifetimeStats::day_key(3));
        persistence.save_statistics(&stats).unwrap();
        assert_eq!(persistence.load_statistics(), stats);
    }

    #[test]
    fn test_corrupt_session_entry_leaves_other_difficulties_intact() {
        let mut persistence = Persistence::in_memory();
        persistence
            .save_session_state(Difficulty::Easy, &snapshot(6))
            .unwrap();
        let mut raw = serde_json::to_value(persistence.load_session_states()).unwrap();
        let mut hard = serde_json::to_value(snapshot(6)).unwrap();
        hard["history"][0]["guess"] = serde_json::json!([1, 1, 1, 1, 1]);
        raw["hard"] = hard;
        raw["veteran"] = serde_json::json!({});
        persistence
            .store
            .set(GAME_STATE_KEY, &raw.to_string())
            .unwrap();

        assert_eq!(persistence.load_session_state(Difficulty::Hard), None);
        assert_eq!(
            persistence.load_session_state(Difficulty::Easy),
            Some(snapshot(6))
        );

        persistence
            .save_session_state(Difficulty::Normal, &snapshot(6))
            .unwrap();
        assert_eq!(
            persistence.load_session_state(Difficulty::Easy),
            Some(snapshot(6))
        );
        assert_eq!(
            persistence.load_session_state(Difficulty::Normal),
            Some(snapshot(6))
        );
        let states = persistence.load_session_states();
        assert!(!states.contains_key("hard"));
        assert!(!states.contains_key("veteran"));

        persistence.clear_session_state(Difficulty::Normal).unwrap();
        assert_eq!(
            persistence.load_session_state(Difficulty::Easy),
            Some(snapshot(6))
        );
    }

    #[test]
    fn test_unavailable_storage_loads_defaults_and_reports_saves() {
        let mut persistence = Persistence::new(BrokenStore);
        assert_eq!(persistence.load_theme(), Theme::Number);
        assert_eq!(persistence.load_session_state(Difficulty::Easy), None);
        assert!(persistence.save_theme(Theme::Color).is_err());
        assert!(persistence
            .save_session_state(Difficulty::Easy, &snapshot(1))
            .is_err());
    }

    #[test]
    fn test_sessions_are_kept_per_difficulty() {
        let mut persistence = Persistence::in_memory();
        persistence
            .save_session_state(Difficulty::Easy, &snapshot(4))
            .unwrap();
        persistence
            .save_session_state(Difficulty::Hard, &snapshot(5))
            .unwrap();

        assert_eq!(
            persistence.load_session_state(Difficulty::Easy),
            Some(snapshot(4))
        );
        assert_eq!(persistence.load_session_state(Difficulty::Normal), None);

        persistence.clear_session_state(Difficulty::Easy).unwrap();
        assert_eq!(persistence.load_session_state(Difficulty::Easy), None);
        assert_eq!(
            persistence.load_session_state(Difficulty::Hard),
            Some(snapshot(5))
        );

        persistence.clear_session_state(Difficulty::Hard).unwrap();
        persistence.clear_session_state(Difficulty::Hard).unwrap();
        assert_eq!(persistence.load_session_state(Difficulty::Hard), None);
    }

    #[test]
    fn test_session_states_share_one_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut persistence = Persistence::new(FileStore::new(dir.path()));
        persistence
            .save_session_state(Difficulty::Normal, &snapshot(2))
            .unwrap();
        persistence
            .save_session_state(Difficulty::Hard, &snapshot(2))
            .unwrap();

        let contents = fs::read_to_string(dir.path().join("sequencele-game-state.json")).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(raw["normal"]["dayNumber"], 2);
        assert_eq!(raw["normal"]["slots"][0], 3);
        assert_eq!(raw["hard"]["elapsedSeconds"], 30);
        assert!(raw.get("easy").is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let data_dir = dir.path().join("nested");
        let mut store = FileStore::new(&data_dir);

        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        store.set(THEME_KEY, "\"color\"").unwrap();
        assert!(data_dir.join("sequencele-theme.json").exists());
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("\"color\""));

        store.remove(THEME_KEY).unwrap();
        store.remove(THEME_KEY).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_backed_persistence_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let mut persistence = Persistence::new(FileStore::new(dir.path()));
            persistence.save_difficulty(Difficulty::Easy).unwrap();
            persistence
                .save_session_state(Difficulty::Easy, &snapshot(9))
                .unwrap();
        }
        let persistence = Persistence::new(FileStore::new(dir.path()));
        assert_eq!(persistence.load_difficulty(), Difficulty::Easy);
        assert_eq!(
            persistence.load_session_state(Difficulty::Easy),
            Some(snapshot(9))
        );
    }
}
