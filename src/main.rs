mod app;
mod config;
mod deck;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use deck::{Deck, DeckFiles};
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "flashdeck")]
#[command(version)]
#[command(about = "Flash cards in the terminal, from a two-column CSV word list")]
struct Args {
    /// Directory holding the word lists (default: ./data)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Word list file name inside the data directory (default: source.csv)
    #[arg(long)]
    source: Option<String>,

    /// Ask the second column and answer with the first
    #[arg(long)]
    swap: bool,

    /// Don't save progress for this session
    #[arg(long)]
    no_save: bool,

    /// Print the deck that would be studied as JSON and exit
    #[arg(short, long)]
    status: bool,

    /// Forget saved progress and start over from the full word list
    #[arg(long)]
    reset: bool,
}

impl Args {
    /// Command line flags win over the config file
    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(source) = &self.source {
            config.source_file = source.clone();
        }
        if self.swap {
            config.swap_sides = true;
        }
        if self.no_save {
            config.persist_progress = false;
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File(PathBuf),
    Off,
}

impl LogTarget {
    /// The TUI owns the terminal, so it logs to a file under `cache_dir`
    /// (or nowhere). One-shot commands log to stderr.
    fn for_mode(tui: bool, cache_dir: Option<PathBuf>) -> Self {
        if !tui {
            return LogTarget::Stderr;
        }
        match cache_dir {
            Some(dir) => LogTarget::File(dir.join("flashdeck").join("flashdeck.log")),
            None => LogTarget::Off,
        }
    }
}

fn init_logging(target: LogTarget) {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    let file = match &target {
        LogTarget::File(path) => {
            let opened = path
                .parent()
                .map(std::fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|()| OpenOptions::new().create(true).append(true).open(path));
            match opened {
                Ok(file) => Some(file),
                // Nowhere safe to write while the TUI is up
                Err(_) => return,
            }
        }
        LogTarget::Off => return,
        LogTarget::Stderr => None,
    };

    match file {
        Some(file) => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(filter)
            .init(),
        None => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let tui = !(args.status || args.reset);
    init_logging(LogTarget::for_mode(tui, dirs::cache_dir()));

    let mut config = AppConfig::load().unwrap_or_default();
    args.apply(&mut config);
    let files = config.deck_files();

    // Handle CLI-only commands
    if args.reset {
        return reset_progress(&files);
    }

    let deck = load_deck(&config, &files)?;

    if args.status {
        return print_status(&deck, &files);
    }

    run_tui(deck, &config)
}

/// Load the snapshot if there is one, otherwise the full word list.
/// Any failure here is fatal.
fn load_deck(config: &AppConfig, files: &DeckFiles) -> Result<Deck> {
    let path = files.resolve();
    if files.is_resuming() {
        tracing::info!("Resuming from {}", path.display());
    }

    let mut deck = Deck::load(path, config.load_options())
        .with_context(|| format!("Could not load word list {}", path.display()))?
        .with_orientation(config.orientation());
    // A no-save session still resumes, it just never writes back
    if config.persist_progress {
        if let Some(progress) = &files.progress {
            deck = deck.with_progress(progress);
        }
    }
    Ok(deck)
}

fn reset_progress(files: &DeckFiles) -> Result<()> {
    if files.reset()? {
        println!("Progress cleared, next session starts from {}", files.source.display());
    } else {
        println!("No saved progress to clear");
    }
    Ok(())
}

fn print_status(deck: &Deck, files: &DeckFiles) -> Result<()> {
    let (question, answer) = deck.labels();
    let output = serde_json::json!({
        "source": files.resolve().display().to_string(),
        "resumed": files.is_resuming(),
        "progress_file": deck.progress_path().map(|p| p.display().to_string()),
        "question": question,
        "answer": answer,
        "remaining": deck.len(),
        "finished": deck.is_empty(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn run_tui(deck: Deck, config: &AppConfig) -> Result<()> {
    ui::init_theme(Theme::load(&config.theme));

    // Create app state before touching the terminal
    let mut app = App::new(deck, config.notifications);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if result.is_ok() {
        println!(
            "Learned {} and reviewed {} cards, {} left",
            app.learned,
            app.reviewed,
            app.deck.len()
        );
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            let handled = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height))
                }
                _ => Ok(()),
            };

            // Errors go to the info line instead of tearing down the UI
            if let Err(e) = handled {
                tracing::debug!("{:#}", e);
                app.set_status(format!("Error: {}", e));
            }
        }

        if app.should_quit {
            return Ok(());
        }

        app.tick();
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("accessories-dictionary")
        .show()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_log_target() {
        assert_eq!(LogTarget::for_mode(false, Some(PathBuf::from("/cache"))), LogTarget::Stderr);
        assert_eq!(
            LogTarget::for_mode(true, Some(PathBuf::from("/cache"))),
            LogTarget::File(PathBuf::from("/cache/flashdeck/flashdeck.log"))
        );
        assert_eq!(LogTarget::for_mode(true, None), LogTarget::Off);
    }

    #[test]
    fn test_no_save_resumes_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let progress = dir.path().join("to_learn.csv");
        fs::write(dir.path().join("source.csv"), "French,English\nchat,cat\nchien,dog\n").unwrap();
        fs::write(&progress, "French,English\nchien,dog\n").unwrap();

        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            persist_progress: false,
            ..Default::default()
        };
        let files = config.deck_files();
        let mut deck = load_deck(&config, &files).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.progress_path(), None);

        deck.draw_random();
        deck.mark_known().unwrap();
        assert!(deck.is_empty());
        assert_eq!(fs::read_to_string(&progress).unwrap(), "French,English\nchien,dog\n");
    }

    #[test]
    fn test_saving_session_writes_progress() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("source.csv"), "French,English\nchat,cat\n").unwrap();

        let config = AppConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut deck = load_deck(&config, &config.deck_files()).unwrap();
        deck.draw_random();
        deck.mark_known().unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("to_learn.csv")).unwrap(),
            "French,English\n"
        );
    }
}
