use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use ved::render::Screen;
use ved::{config, file, log, Outcome, Session};

#[derive(Parser)]
#[command(name = "ved", about = "A minimal modal text editor for the terminal")]
struct Args {
    /// File to edit. Must already exist.
    path: PathBuf,

    /// Show the debug row from the start (also toggled at runtime with :debug).
    #[arg(long)]
    verbose: bool,

    /// Minimum level written to the session log: debug, info, warn, error.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let cfg = config::Config::load();

    if let Some(level) = args
        .log_level
        .or(cfg.log_level)
        .as_deref()
        .and_then(log::parse_level)
    {
        log::set_level(level);
    }
    let verbose = args.verbose || cfg.verbose.unwrap_or(false);

    let (store, bytes) = match file::FileStore::open(&args.path) {
        Ok(opened) => opened,
        Err(err) => {
            eprintln!("ved: {err}");
            return ExitCode::FAILURE;
        }
    };

    let rows = terminal::size().map(|(_, h)| h as usize).unwrap_or(24);
    let mut session = Session::new(store, &bytes, rows, verbose);

    log::entry(
        log::Level::Info,
        "session_start",
        &serde_json::json!({
            "path": args.path.display().to_string(),
            "lines": session.buffer().line_count(),
            "bytes": bytes.len(),
        }),
    );

    let result = run(&mut session);
    restore_terminal();
    if let Err(err) = result {
        eprintln!("ved: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(session: &mut Session) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut screen = Screen::new();
    screen.draw(session)?;

    loop {
        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if session.handle_key(key) == Outcome::Quit {
                    return Ok(());
                }
            }
            Event::Resize(_, rows) => session.resize(rows as usize),
            _ => continue,
        }
        screen.draw(session)?;
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    terminal::disable_raw_mode().ok();
}
