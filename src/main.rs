use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    process,
    time::Instant,
};
use tracing::info;

use typeclock::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Settings, DEFAULT_DICTIONARY},
    dictionary::{Dictionaries, DictionaryError, WordSource},
    history::{HistoryBackend, HistoryStore, JsonFileBackend},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    ui,
    word_sampler::WordSampler,
};

/// minimal terminal typing test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal typing test for your terminal. Type the passage before the timer runs out; results are kept in a local history for trend reporting."
)]
pub struct Cli {
    /// test time in seconds
    #[clap(short = 'd', long, default_value_t = 30, allow_negative_numbers = true)]
    duration: i64,

    /// number of words in the passage
    #[clap(short = 'w', long, default_value_t = 50, allow_negative_numbers = true)]
    word_count: i64,

    /// show past results and statistics instead of starting a test
    #[clap(long = "history")]
    show_history: bool,

    /// dictionary to draw words from (bundled: default, code)
    #[clap(short = 'D', long, default_value = DEFAULT_DICTIONARY)]
    dictionary: String,

    /// where to keep the results history
    #[clap(long)]
    history_file: Option<PathBuf>,

    /// delete all saved results and exit
    #[clap(long)]
    clear_history: bool,
}

impl Cli {
    fn to_settings(&self) -> Result<Settings, typeclock::config::ConfigError> {
        let settings = Settings::new(
            self.duration,
            self.word_count,
            self.show_history,
            self.dictionary.clone(),
        )?;
        Ok(match &self.history_file {
            Some(path) => settings.with_history_path(path),
            None => settings,
        })
    }
}

fn history_backend(settings: &Settings) -> JsonFileBackend {
    match &settings.history_path {
        Some(path) => JsonFileBackend::with_path(path),
        None => JsonFileBackend::new(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let settings = match cli.to_settings() {
        Ok(settings) => settings,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    let backend = history_backend(&settings);

    if cli.clear_history {
        let mut store = HistoryStore::open(backend);
        if let Err(e) = store.clear() {
            eprintln!("error: {e}");
            process::exit(1);
        }
        println!("history cleared");
        return Ok(());
    }

    let words = match Dictionaries::new().words(&settings.dictionary) {
        Ok(words) => words,
        Err(e) => {
            eprintln!("error: {e}");
            if let DictionaryError::NotFound(_) = e {
                eprintln!(
                    "bundled dictionaries: {}",
                    Dictionaries::bundled_names().join(", ")
                );
            }
            process::exit(1);
        }
    };
    let sampler = WordSampler::new(words)?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // Only interactive runs log; one-shot commands leave the data dir alone.
    logging::init(AppDirs::log_path().as_deref());
    info!(?settings, "starting");

    let mut app = App::new(settings, sampler, HistoryStore::open(backend))?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend, H: HistoryBackend>(
    terminal: &mut Terminal<B>,
    app: &mut App<H>,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| ui::draw(f, app, Instant::now()))?;

        let event = runner.step()?;
        if app.handle(event, Instant::now()) == Flow::Quit {
            info!("quit requested");
            break;
        }
    }

    Ok(())
}
