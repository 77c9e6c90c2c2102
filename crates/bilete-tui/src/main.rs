mod actions;
mod app;
mod ui;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::actions::{execute_action, Backend};
use crate::app::App;

#[derive(Debug, Parser)]
#[command(name = "bilete-tui", version, about = "bilete TUI")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    /// Browse an exported ticket list instead of the live API
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    per_page: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = bilete_config::load(args.config).with_context(|| "load config")?;
    let per_page = args.per_page.unwrap_or(config.items_per_page);
    let backend = Backend::from_config(&config, args.file)?;
    let mut app = App::new(per_page, config.prices.clone())?;

    let mut terminal = TerminalGuard::new()?;
    run_app(&mut terminal, &backend, &mut app)
}

fn run_app(terminal: &mut TerminalGuard, backend: &Backend, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        while let Some(action) = app.next_action() {
            if let Err(err) = execute_action(app, backend, action) {
                app.set_error(err.to_string());
            }
        }

        terminal.terminal_mut().draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            break;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    Ok(())
}

struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore_terminal();
            original_hook(info);
        }));

        Ok(Self { terminal })
    }

    fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}
