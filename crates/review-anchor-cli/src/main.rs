mod app;
mod ui;

use std::{env, fs::File, io::stdout, path::PathBuf, process, str::FromStr};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::LevelFilter;
use ratatui::{Terminal, backend::CrosstermBackend};
use review_anchor_config::Config;

use crate::app::{App, Mode};

const BIN_NAME: &str = "review-anchor";

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Logs go to a file because the terminal belongs to the UI
fn init_logging(config: &Config) {
    let level = LevelFilter::from_str(&config.log_level).unwrap_or(LevelFilter::Warn);
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    match File::create(env::temp_dir().join("review-anchor.log")) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {BIN_NAME} <file>");
        process::exit(1);
    }
    let path = PathBuf::from(&args[1]);

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Error: Failed to load config file '{}': {e}",
                Config::config_path().display()
            );
            process::exit(1);
        }
    };
    init_logging(&config);

    let mut app = match App::open(path.clone(), &config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: Cannot open '{}': {e}", path.display());
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if app.dirty {
        println!("Unsaved changes to {} were discarded", app.path.display());
    }

    Ok(())
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Mode::Commenting { input, .. } = &mut app.mode {
            match key.code {
                KeyCode::Enter => app.submit_comment(),
                KeyCode::Esc => app.cancel_comment(),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            continue;
        }

        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1, extend),
            KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1, extend),
            KeyCode::Char('J') => app.move_cursor(1, true),
            KeyCode::Char('K') => app.move_cursor(-1, true),
            KeyCode::Esc => app.clear_selection(),
            KeyCode::Tab => app.indent(false),
            KeyCode::BackTab => app.indent(true),
            KeyCode::Char('c') => app.start_comment(),
            KeyCode::Char(' ') => app.show_popup = !app.show_popup,
            KeyCode::Char('r') => app.resolve_current(),
            KeyCode::Char('o') => app.reopen_current(),
            KeyCode::Char('d') => app.delete_current(),
            KeyCode::Char('s') => {
                if let Err(e) = app.save() {
                    log::error!("Save failed: {e:#}");
                    app.status = format!("Save failed: {e}");
                }
            }
            _ => {}
        }
    }
}
