pub mod clock;
pub mod feedback;
pub mod game_engine;
pub mod persistence;
pub mod sequence_generator;
pub mod settings;
pub mod share;
pub mod stats_manager;

pub use clock::{Clock, ManualClock, SystemClock};
pub use feedback::{evaluate, position_matches};
pub use game_engine::GameEngine;
pub use persistence::{FileStore, KeyValueStore, MemoryStore, Persistence, StorageError};
pub use sequence_generator::{day_number, generate};
pub use settings::Settings;
pub use share::{ShareSummary, GAME_TITLE, SHARE_URL};
pub use stats_manager::StatsManager;
