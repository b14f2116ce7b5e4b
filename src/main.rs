use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use eclipse_typing::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    console::{render, Frame, InputBuffer},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    BoundedWordSource, EngineState, RoundEngine, RoundOutcome, SupportedLanguage, TickOutcome,
    WordList, MAX_MISTAKES,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Write},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

/// type the word before the eclipse closes in
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed word-typing challenge. Every correct word raises the level and shortens the countdown; four mistakes bring the total eclipse."
)]
pub struct Cli {
    /// built-in word list to draw from
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// newline-separated word list to use instead of a built-in one
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// length of one countdown tick in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// how long to wait for the next word before giving up, in milliseconds
    #[clap(long)]
    fetch_timeout_ms: Option<u64>,

    /// config file to read (defaults to the per-user config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective settings to the config file and exit
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(language) = self.language {
            config.language = language;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if let Some(timeout) = self.fetch_timeout_ms {
            config.fetch_timeout_ms = timeout;
        }
        config
    }

    fn word_list(&self, config: &Config) -> Result<WordList, Box<dyn Error>> {
        match &self.words {
            Some(path) => Ok(WordList::from_file(path)?),
            None => Ok(WordList::builtin(config.language)?),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = cli.apply(store.load());

    if cli.save_config {
        store.save(&config)?;
        println!("saved {}", store.path().display());
        return Ok(());
    }

    let words = cli.word_list(&config)?;
    if words.is_empty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::InvalidValue, "word list is empty").exit();
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    tracing::info!(list = words.name(), size = words.len(), ?config, "starting");
    let source = BoundedWordSource::spawn(words, config.fetch_timeout());
    let mut engine = RoundEngine::with_curve(source, config.difficulty);
    engine.subscribe(|change| {
        tracing::trace!(field = %change.field, old = %change.old, new = %change.new, "state change");
    });
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_interval()),
    );

    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = play(&mut stdout, &mut engine, &mut runner);

    disable_raw_mode()?;
    execute!(stdout, Show, LeaveAlternateScreen)?;

    let session = engine.snapshot();
    tracing::info!(level = session.level, mistakes = session.mistakes, "exiting");
    result
}

fn play<W: Write>(
    out: &mut W,
    engine: &mut RoundEngine<BoundedWordSource>,
    runner: &mut Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    let mut input = InputBuffer::default();
    let mut status = engine.start_session().err().map(|err| err.to_string());
    runner.reset_cadence();

    loop {
        let session = engine.snapshot();
        render(
            out,
            &Frame {
                state: engine.state(),
                session: &session,
                input: input.as_str(),
                status: status.as_deref(),
            },
        )?;

        match runner.step() {
            GameEvent::Tick => {
                let Some(stamp) = engine.clock_stamp() else {
                    continue;
                };
                match engine.on_tick(stamp, input.as_str()) {
                    Ok(TickOutcome::TimedOut(outcome)) => {
                        input.clear();
                        status = Some(describe(outcome, true));
                        runner.reset_cadence();
                    }
                    Ok(_) => {}
                    Err(err) => {
                        input.clear();
                        status = Some(err.to_string());
                    }
                }
            }
            GameEvent::Resize => {}
            GameEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Enter => {
                    let result = match engine.state() {
                        EngineState::RoundActive => {
                            engine.submit(&input.take()).map(|o| Some(describe(o, false)))
                        }
                        EngineState::Ended => engine.restart().map(|_| None),
                        EngineState::Idle => engine.start_round().map(|_| None),
                        EngineState::Evaluating => Ok(None),
                    };
                    status = result.unwrap_or_else(|err| Some(err.to_string()));
                    input.clear();
                    runner.reset_cadence();
                }
                KeyCode::Backspace => input.backspace(),
                KeyCode::Char(c) if engine.state() == EngineState::RoundActive => input.push(c),
                _ => {}
            },
        }
    }

    Ok(())
}

fn describe(outcome: RoundOutcome, timed_out: bool) -> String {
    match outcome {
        RoundOutcome::LevelUp { level } => format!("Correct! Level {level}."),
        RoundOutcome::Mistake { mistakes } if timed_out => {
            format!("Time's up. Mistake {mistakes} of {MAX_MISTAKES}.")
        }
        RoundOutcome::Mistake { mistakes } => {
            format!("Wrong word. Mistake {mistakes} of {MAX_MISTAKES}.")
        }
        RoundOutcome::SessionEnded { .. } => "The sun is gone.".to_string(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal is in raw mode while playing, so logs go to a file.
    let writer = AppDirs::log_path()
        .and_then(|path| {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).ok()?;
            }
            OpenOptions::new().create(true).append(true).open(path).ok()
        })
        .map(|file| BoxMakeWriter::new(Mutex::new(file)))
        .unwrap_or_else(|| BoxMakeWriter::new(io::sink));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);

    if matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json")) {
        builder.json().with_current_span(true).init();
    } else {
        builder.compact().init();
    }
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        tracing::error!(%info, "panic");
        default_hook(info);
    }));
}
