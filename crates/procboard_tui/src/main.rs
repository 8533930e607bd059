//! Terminal dashboard for tracking process records.
//!
//! # Responsibility
//! - Wire configuration, logging and storage into the record service.
//! - Run the synchronous draw/input loop and restore the terminal on exit.

mod app;
mod ui;

use crate::app::App;
use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use procboard_core::db::open_db;
use procboard_core::{
    init_logging, AppConfig, RecordRepository, RecordService, SqliteRecordRepository,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::Duration;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("resolve configuration")?;

    init_logging(&config.log_level, &config.log_dir.to_string_lossy())
        .map_err(|message| anyhow!(message))
        .context("initialize logging")?;

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create database directory {}", parent.display()))?;
    }
    let conn = open_db(&config.db_path)
        .with_context(|| format!("open database {}", config.db_path.display()))?;
    let repo = SqliteRecordRepository::try_new(&conn).context("prepare record repository")?;
    let service = RecordService::new(repo);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let result = run_loop(&mut terminal, &service);

    disable_raw_mode().ok();
    execute!(io::stdout(), LeaveAlternateScreen).ok();
    result
}

fn run_loop<R: RecordRepository>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: &RecordService<R>,
) -> Result<()> {
    let mut app = App::new();
    app.refresh(service);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &app))
            .context("draw frame")?;

        // Poll with a short timeout so the loop stays responsive without
        // burning a core.
        if event::poll(Duration::from_millis(200)).context("poll input")? {
            if let Event::Key(key) = event::read().context("read input")? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.on_key(key, service) {
                    return Ok(());
                }
            }
        }
    }
}
