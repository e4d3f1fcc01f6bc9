pub mod app;
pub mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use minitodo_core::{Config, TaskRepository, TaskStore};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use crate::tui::app::{App, InputMode, ViewMode};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run<R: TaskRepository>(
    mut store: TaskStore<R>,
    config: &Config,
    view_mode: ViewMode,
    notices: Vec<String>,
) -> Result<()> {
    if config.bell {
        // Terminal stand-in for a completion sound.
        store.set_completion_hook(|_| {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07").and_then(|_| stdout.flush());
        });
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(store, config, view_mode);
    for notice in notices {
        app.show_warning(notice);
    }
    info!(target: "tui", mode = ?view_mode, "ui started");
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(target: "tui", "ui loop failed: {err}");
        eprintln!("Error: {err}");
    }
    if app.store.is_dirty() {
        eprintln!("Warning: the last changes could not be saved; see the log for details");
    }

    Ok(())
}

fn run_app<B: Backend, R: TaskRepository>(terminal: &mut Terminal<B>, app: &mut App<R>) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_status(),
                KeyCode::Char('s') => app.toggle_priority(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_task(),
                KeyCode::Char('a') => app.enter_add_mode(),
                KeyCode::Char('e') => app.enter_edit_mode(),
                KeyCode::Char('c') => app.toggle_completed_section(),
                KeyCode::Char('x') => app.clear_completed(),
                KeyCode::Char('m') => app.switch_view_mode(),
                _ => {}
            },
            InputMode::Adding | InputMode::Editing(_) => match key.code {
                KeyCode::Enter => app.submit_input(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
    Ok(())
}
