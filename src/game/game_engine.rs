use log::{error, info, trace, warn};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use super::clock::Clock;
use super::feedback::{evaluate, position_matches};
use super::persistence::Persistence;
use super::sequence_generator::{day_number, generate};
use super::settings::Settings;
use super::share::ShareSummary;
use super::stats_manager::StatsManager;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    AttemptRecord, Difficulty, GameEngineCommand, GameEngineEvent, GamePhase, GameResult,
    LifetimeStats, Sequence, SessionSnapshot, Slots, Theme, TimerState, MAX_ATTEMPTS,
    SEQUENCE_LENGTH,
};

/// The daily game for one difficulty at a time. Every mutation goes through `&mut self`; the
/// presentation layer reads state through the accessors and listens to [`GameEngineEvent`]s.
pub struct GameEngine {
    difficulty: Difficulty,
    theme: Theme,
    dark_mode: bool,
    day_override: Option<i64>,
    day_number: i64,
    hidden_sequence: Sequence,
    slots: Slots,
    attempts: u32,
    history: Vec<AttemptRecord>,
    best_score: usize,
    result: Option<GameResult>,
    timer_state: TimerState,
    playthrough_id: Uuid,
    persistence: Persistence,
    stats_manager: StatsManager,
    clock: Rc<dyn Clock>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<GameEngineCommand> for GameEngine {
    fn handle_event(&mut self, event: &GameEngineCommand) {
        self.handle_command(event.clone());
    }
}

impl GameEngine {
    pub fn new(
        persistence: Persistence,
        clock: Rc<dyn Clock>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    ) -> Self {
        Self::with_day_override(persistence, clock, game_engine_event_emitter, None)
    }

    /// Like [`GameEngine::new`], but plays puzzle `day_override` instead of today's
    pub fn with_day_override(
        persistence: Persistence,
        clock: Rc<dyn Clock>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        day_override: Option<i64>,
    ) -> Self {
        let settings = Settings::load(&persistence);
        let stats_manager = StatsManager::load(&persistence);
        let day = day_override.unwrap_or_else(|| day_number(clock.now()));

        let mut engine = Self {
            difficulty: settings.difficulty,
            theme: settings.theme,
            dark_mode: settings.dark_mode,
            day_override,
            day_number: day,
            hidden_sequence: generate(day, settings.difficulty),
            slots: Slots::default(),
            attempts: 0,
            history: Vec::new(),
            best_score: 0,
            result: None,
            timer_state: TimerState::default(),
            playthrough_id: Uuid::new_v4(),
            persistence,
            stats_manager,
            clock,
            game_engine_event_emitter,
            subscription: None,
        };
        engine.start_session(settings.difficulty);
        engine
    }

    /// Routes commands from `observer` into the engine until [`Destroyable::destroy`]
    pub fn wire_subscription(
        engine: &Rc<RefCell<Self>>,
        game_engine_command_observer: &EventObserver<GameEngineCommand>,
    ) {
        let engine_handler = Rc::clone(engine);
        let subscription = game_engine_command_observer.subscribe(move |command| {
            engine_handler.borrow_mut().handle_event(command);
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::PlaceInSlot(index, value) => {
                self.place_in_slot(index, value);
            }
            GameEngineCommand::RemoveFromSlot(index) => {
                self.remove_from_slot(index);
            }
            GameEngineCommand::Submit => {
                self.submit_guess();
            }
            GameEngineCommand::ChangeDifficulty(difficulty) => self.change_difficulty(difficulty),
            GameEngineCommand::ChangeTheme(theme) => self.change_theme(theme),
            GameEngineCommand::SetDarkMode(dark_mode) => self.set_dark_mode(dark_mode),
            GameEngineCommand::StartClock => self.start_clock(),
            GameEngineCommand::Tick => {
                self.tick();
            }
        }
    }

    fn current_day_number(&self) -> i64 {
        self.day_override
            .unwrap_or_else(|| day_number(self.clock.now()))
    }

    /// Resets to a fresh game of `difficulty` for today, then resumes today's saved progress
    /// for that difficulty if there is any.
    fn start_session(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.day_number = self.current_day_number();
        self.hidden_sequence = generate(self.day_number, difficulty);
        self.slots.clear();
        self.attempts = 0;
        self.history.clear();
        self.best_score = 0;
        self.result = None;
        self.timer_state = TimerState::default();
        self.playthrough_id = Uuid::new_v4();

        let resumed = match self.persistence.load_session_state(difficulty) {
            Some(snapshot) if !snapshot.belongs_to(self.day_number) => {
                info!(
                    target: "game_engine",
                    "Discarding {} session from day {}; today is day {}",
                    difficulty, snapshot.day_number, self.day_number
                );
                self.discard_saved_session();
                false
            }
            Some(snapshot) if !snapshot.is_consistent() => {
                warn!(
                    target: "game_engine",
                    "Discarding inconsistent {} session: {:?}", difficulty, snapshot
                );
                self.discard_saved_session();
                false
            }
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        };

        info!(
            target: "game_engine",
            "Day {} {} game {} (playthrough {})",
            self.day_number,
            difficulty,
            if resumed { "resumed" } else { "started" },
            self.playthrough_id
        );

        self.game_engine_event_emitter
            .emit(GameEngineEvent::GameStarted {
                difficulty,
                day_number: self.day_number,
                resumed,
            });
        self.sync_slots();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::HistoryVisibilityChanged(
                self.history_visible(),
            ));
        self.game_engine_event_emitter
            .emit(GameEngineEvent::TimerTicked(self.elapsed_seconds()));
    }

    fn restore(&mut self, snapshot: SessionSnapshot) {
        self.slots = snapshot.slots;
        self.attempts = snapshot.attempts;
        self.history = snapshot.history;
        self.best_score = snapshot.best_score;
        self.timer_state = TimerState::restored(snapshot.elapsed.as_secs());
    }

    fn discard_saved_session(&mut self) {
        if let Err(e) = self.persistence.clear_session_state(self.difficulty) {
            error!(target: "game_engine", "Could not clear saved session: {}", e);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            day_number: self.day_number,
            slots: self.slots,
            attempts: self.attempts,
            history: self.history.clone(),
            best_score: self.best_score,
            elapsed: self.timer_state.elapsed(self.clock.now()),
        }
    }

    /// Saves the running game. Finished games are never saved; their entry is cleared instead.
    fn save_state(&mut self) {
        if self.is_over() {
            return;
        }
        let snapshot = self.snapshot();
        if let Err(e) = self
            .persistence
            .save_session_state(self.difficulty, &snapshot)
        {
            error!(target: "game_engine", "Could not save session; continuing: {}", e);
        }
    }

    fn sync_slots(&mut self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SlotsUpdated(self.slots));
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SubmissionReadyChanged(self.can_submit()));
    }

    /// Puts `value` into slot `index`. Returns false, changing nothing, when the game is over,
    /// the index is out of range or the value is already placed.
    pub fn place_in_slot(&mut self, index: usize, value: u8) -> bool {
        if self.is_over() || !self.slots.place(index, value) {
            trace!(target: "game_engine", "Rejected placing {} in slot {}", value, index);
            return false;
        }
        self.start_clock();
        self.save_state();
        self.sync_slots();
        true
    }

    /// Empties slot `index`, returning the value to the pool
    pub fn remove_from_slot(&mut self, index: usize) -> Option<u8> {
        if self.is_over() {
            return None;
        }
        let value = self.slots.remove(index)?;
        self.save_state();
        self.sync_slots();
        Some(value)
    }

    /// Scores the filled slots against the hidden sequence. Returns `None` without touching
    /// anything unless all slots are filled and the game is still running.
    pub fn submit_guess(&mut self) -> Option<AttemptRecord> {
        if self.is_over() {
            return None;
        }
        let guess = self.slots.to_sequence()?;

        self.attempts += 1;
        let correct_count = evaluate(&guess, &self.hidden_sequence);
        self.best_score = self.best_score.max(correct_count);
        let record = AttemptRecord::new(self.attempts, correct_count, guess);
        self.history.insert(0, record);
        trace!(
            target: "game_engine",
            "Attempt {}: {} -> {} correct",
            self.attempts, guess, correct_count
        );
        self.game_engine_event_emitter
            .emit(GameEngineEvent::AttemptRecorded(record));

        if correct_count == SEQUENCE_LENGTH {
            self.end_game(true);
        } else if self.attempts >= MAX_ATTEMPTS {
            self.end_game(false);
        } else {
            self.slots.clear();
            self.save_state();
            self.sync_slots();
            self.game_engine_event_emitter
                .emit(GameEngineEvent::HistoryVisibilityChanged(
                    self.history_visible(),
                ));
        }
        Some(record)
    }

    fn end_game(&mut self, won: bool) {
        let now = self.clock.now();
        self.timer_state = self.timer_state.stopped(now);
        let result = GameResult {
            playthrough_id: self.playthrough_id,
            difficulty: self.difficulty,
            day_number: self.day_number,
            won,
            attempts: self.attempts,
            elapsed: self.timer_state.elapsed(now),
        };
        info!(
            target: "game_engine",
            "Game over: {} in {} attempts (playthrough {})",
            if won { "won" } else { "lost" },
            self.attempts,
            self.playthrough_id
        );

        match self
            .stats_manager
            .record_game(&result, &mut self.persistence)
        {
            Ok(true) => (),
            Ok(false) => info!(
                target: "game_engine",
                "Day {} already counted in statistics", self.day_number
            ),
            Err(e) => error!(target: "game_engine", "Could not save statistics: {}", e),
        }
        self.discard_saved_session();
        self.result = Some(result.clone());

        self.game_engine_event_emitter
            .emit(GameEngineEvent::SubmissionReadyChanged(false));
        self.game_engine_event_emitter
            .emit(GameEngineEvent::GameCompleted(result));
    }

    /// Saves the current game, then switches to `difficulty`, resuming today's progress for
    /// it when there is some.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        if difficulty == self.difficulty {
            return;
        }
        self.save_state();
        self.start_session(difficulty);
        if let Err(e) = self.persistence.save_difficulty(difficulty) {
            error!(target: "game_engine", "Could not save difficulty: {}", e);
        }
    }

    pub fn change_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.persistence.save_theme(theme) {
            error!(target: "game_engine", "Could not save theme: {}", e);
        }
        self.game_engine_event_emitter
            .emit(GameEngineEvent::ThemeChanged(theme));
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.dark_mode = dark_mode;
        if let Err(e) = self.persistence.save_dark_mode(dark_mode) {
            error!(target: "game_engine", "Could not save dark mode: {}", e);
        }
        self.game_engine_event_emitter
            .emit(GameEngineEvent::DarkModeChanged(dark_mode));
    }

    /// Starts the game clock on first interaction; later calls keep the original start
    pub fn start_clock(&mut self) {
        if self.is_over() || self.timer_state.is_started() {
            return;
        }
        self.timer_state = self.timer_state.started(self.clock.now());
    }

    /// Periodic display refresh. Returns the elapsed seconds while the clock runs and `None`
    /// once it is stopped or not yet started, which is the signal to stop ticking.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.timer_state.is_running() {
            return None;
        }
        let seconds = self.elapsed_seconds();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::TimerTicked(seconds));
        Some(seconds)
    }

    pub fn phase(&self) -> GamePhase {
        match &self.result {
            Some(result) if result.won => GamePhase::Won,
            Some(_) => GamePhase::Lost,
            None if self.slots.is_full() => GamePhase::ReadyToSubmit,
            None => GamePhase::AwaitingInput,
        }
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.phase() == GamePhase::ReadyToSubmit
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn day_number(&self) -> i64 {
        self.day_number
    }

    pub fn slots(&self) -> &Slots {
        &self.slots
    }

    pub fn available_values(&self) -> Vec<u8> {
        self.slots.available_values()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        MAX_ATTEMPTS
    }

    pub fn best_score(&self) -> usize {
        self.best_score
    }

    /// Most recent attempt first
    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    /// Hard mode never shows history; otherwise it shows once there is something in it
    pub fn history_visible(&self) -> bool {
        self.difficulty.shows_history() && !self.history.is_empty()
    }

    pub fn shows_position_hints(&self) -> bool {
        self.difficulty.shows_position_hints()
    }

    pub fn position_matches(&self, record: &AttemptRecord) -> [bool; SEQUENCE_LENGTH] {
        position_matches(&record.guess, &self.hidden_sequence)
    }

    /// Per-slot hints for `record`, only on difficulties that show them
    pub fn position_hints(&self, record: &AttemptRecord) -> Option<[bool; SEQUENCE_LENGTH]> {
        self.shows_position_hints()
            .then(|| self.position_matches(record))
    }

    /// The hidden sequence, once the game is over
    pub fn revealed_sequence(&self) -> Option<&Sequence> {
        self.is_over().then_some(&self.hidden_sequence)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.timer_state.elapsed_seconds(self.clock.now())
    }

    pub fn playthrough_id(&self) -> Uuid {
        self.playthrough_id
    }

    pub fn statistics(&self) -> &LifetimeStats {
        self.stats_manager.stats()
    }

    pub fn win_rate(&self) -> u32 {
        self.stats_manager.win_rate()
    }

    pub fn share_text(&self) -> Option<String> {
        let result = self.result.as_ref()?;
        Some(
            ShareSummary {
                day_number: result.day_number,
                difficulty: result.difficulty,
                theme: self.theme,
                attempts: result.attempts,
                best_score: self.best_score,
                elapsed_seconds: result.elapsed.as_secs(),
            }
            .to_text(),
        )
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }
}
