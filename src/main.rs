use itertools::Itertools;
use log::{info, warn};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use sequencele::destroyable::Destroyable;
use sequencele::events::{Channel, EventEmitter};
use sequencele::game::{
    generate, FileStore, GameEngine, MemoryStore, Persistence, Settings, SystemClock,
};
use sequencele::model::{
    format_elapsed, Difficulty, GameEngineCommand, GameEngineEvent, Theme, DISTRIBUTION_RANGES,
};

const HELP: &str = "\
commands:
  place <slot 1-5> <value 1-5>   put a value into a slot
  remove <slot 1-5>              empty a slot
  submit                         score the current guess
  difficulty <easy|normal|hard>  switch puzzles (progress is kept per difficulty)
  theme <number|color|brainrot>  change symbols
  dark <on|off>                  dark mode preference
  stats | share | show | help | quit";

fn init_logging() {
    env_logger::init();
}

fn open_persistence() -> Persistence {
    match Settings::data_dir() {
        Some(dir) => {
            info!("Storing game data in {}", dir.display());
            Persistence::new(FileStore::new(dir))
        }
        None => {
            warn!("No data directory available; progress will not be saved");
            Persistence::new(MemoryStore::new())
        }
    }
}

/// Messages for events the board rendering does not already cover
fn describe_event(event: &GameEngineEvent) -> Option<String> {
    match event {
        GameEngineEvent::GameStarted {
            difficulty,
            day_number,
            resumed: true,
        } => Some(format!("Resumed {} puzzle #{}", difficulty, day_number)),
        GameEngineEvent::GameStarted {
            difficulty,
            day_number,
            resumed: false,
        } => Some(format!("New {} puzzle #{}", difficulty, day_number)),
        GameEngineEvent::AttemptRecorded(record) => Some(format!(
            "Attempt {}: {} in the right spot",
            record.attempt, record.correct_count
        )),
        GameEngineEvent::GameCompleted(result) if result.won => Some(format!(
            "Solved in {} attempts ({})!",
            result.attempts,
            format_elapsed(result.elapsed.as_secs())
        )),
        GameEngineEvent::GameCompleted(_) => Some("Out of attempts.".to_string()),
        GameEngineEvent::ThemeChanged(theme) => Some(format!("Theme: {}", theme.display_name())),
        GameEngineEvent::DarkModeChanged(dark_mode) => Some(format!(
            "Dark mode {}",
            if *dark_mode { "on" } else { "off" }
        )),
        _ => None,
    }
}

fn render(engine: &GameEngine, debug_mode: bool) -> String {
    let theme = engine.theme();
    let symbol = |value: u8| theme.symbol(value).to_string();
    let mut lines = Vec::new();

    lines.push(format!(
        "#{} {} | attempts {}/{} | best {}/5 | time {}",
        engine.day_number(),
        engine.difficulty(),
        engine.attempts(),
        engine.max_attempts(),
        engine.best_score(),
        format_elapsed(engine.elapsed_seconds())
    ));
    lines.push(format!(
        "slots: [{}]",
        engine
            .slots()
            .cells()
            .iter()
            .map(|cell| cell.map(symbol).unwrap_or_else(|| "_".to_string()))
            .join("] [")
    ));
    lines.push(format!(
        "pool:  {}",
        engine.available_values().into_iter().map(symbol).join(" ")
    ));

    if engine.history_visible() {
        for record in engine.history() {
            let cells = match engine.position_hints(record) {
                Some(hints) => record
                    .guess
                    .iter()
                    .zip(hints)
                    .map(|(value, hit)| {
                        if hit {
                            format!("*{}*", symbol(*value))
                        } else {
                            symbol(*value)
                        }
                    })
                    .join(" "),
                None => record.guess.iter().map(|v| symbol(*v)).join(" "),
            };
            lines.push(format!(
                "  {:>2}. {}  -> {} correct",
                record.attempt, cells, record.correct_count
            ));
        }
    }

    if let Some(sequence) = engine.revealed_sequence() {
        lines.push(format!(
            "answer: {}",
            sequence.iter().map(|v| symbol(*v)).join(" ")
        ));
    } else if debug_mode {
        let hidden = generate(engine.day_number(), engine.difficulty());
        lines.push(format!("debug answer: {}", hidden));
    }
    lines.join("\n")
}

fn render_stats(engine: &GameEngine) -> String {
    let stats = engine.statistics();
    let mut lines = vec![format!(
        "played {} | win % {} | streak {} | max streak {}",
        stats.played,
        engine.win_rate(),
        stats.current_streak,
        stats.max_streak
    )];
    let counts = stats.guess_distribution.counts();
    let widest = counts.iter().copied().max().unwrap_or(0).max(1);
    for (label, count) in DISTRIBUTION_RANGES.iter().zip(counts) {
        let bar = "#".repeat((count * 20 / widest) as usize);
        lines.push(format!("{:>5} {} {}", label, bar, count));
    }
    lines.join("\n")
}

fn parse_slot(arg: Option<&str>) -> Option<usize> {
    let slot: usize = arg?.parse().ok()?;
    slot.checked_sub(1)
}

fn parse_command(line: &str) -> Result<Option<GameEngineCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let command = match verb {
        "place" | "p" => {
            let slot = parse_slot(parts.next()).ok_or("usage: place <slot 1-5> <value 1-5>")?;
            let value = parts
                .next()
                .and_then(|v| v.parse::<u8>().ok())
                .ok_or("usage: place <slot 1-5> <value 1-5>")?;
            GameEngineCommand::PlaceInSlot(slot, value)
        }
        "remove" | "r" => GameEngineCommand::RemoveFromSlot(
            parse_slot(parts.next()).ok_or("usage: remove <slot 1-5>")?,
        ),
        "submit" | "s" => GameEngineCommand::Submit,
        "difficulty" => GameEngineCommand::ChangeDifficulty(
            parts.next().unwrap_or_default().parse::<Difficulty>()?,
        ),
        "theme" => {
            GameEngineCommand::ChangeTheme(parts.next().unwrap_or_default().parse::<Theme>()?)
        }
        "dark" => match parts.next() {
            Some("on") => GameEngineCommand::SetDarkMode(true),
            Some("off") => GameEngineCommand::SetDarkMode(false),
            _ => return Err("usage: dark <on|off>".to_string()),
        },
        _ => return Ok(None),
    };
    Ok(Some(command))
}

fn send(command_emitter: &EventEmitter<GameEngineCommand>, command: GameEngineCommand) {
    if matches!(
        command,
        GameEngineCommand::PlaceInSlot(..) | GameEngineCommand::RemoveFromSlot(..)
    ) {
        command_emitter.emit(GameEngineCommand::StartClock);
    }
    command_emitter.emit(command);
}

fn main() -> io::Result<()> {
    init_logging();

    let debug_mode = Settings::is_debug_mode();
    let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();
    let (command_emitter, command_observer) = Channel::<GameEngineCommand>::new();

    event_observer.subscribe(|event: &GameEngineEvent| {
        if let Some(message) = describe_event(event) {
            println!("{}", message);
        }
    });

    let engine = Rc::new(RefCell::new(GameEngine::with_day_override(
        open_persistence(),
        Rc::new(SystemClock),
        event_emitter,
        Settings::day_override_from_env(),
    )));
    GameEngine::wire_subscription(&engine, &command_observer);

    println!("{}\n\n{}", HELP, render(&engine.borrow(), debug_mode));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        command_emitter.emit(GameEngineCommand::Tick);
        match trimmed.split_whitespace().next().unwrap_or_default() {
            "" => (),
            "quit" | "q" => break,
            "help" | "h" => println!("{}", HELP),
            "show" => println!("{}", render(&engine.borrow(), debug_mode)),
            "stats" => println!("{}", render_stats(&engine.borrow())),
            "share" => match engine.borrow().share_text() {
                Some(text) => println!("{}", text),
                None => println!("Finish the puzzle first."),
            },
            _ => match parse_command(trimmed) {
                Ok(Some(command)) => {
                    send(&command_emitter, command);
                    println!("{}", render(&engine.borrow(), debug_mode));
                }
                Ok(None) => println!("Unknown command; type help"),
                Err(message) => println!("{}", message),
            },
        }
        stdout.flush()?;
    }

    engine.borrow_mut().destroy();
    Ok(())
}
