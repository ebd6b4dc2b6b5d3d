use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::Duration;

use bugdle::config::Config;
use bugdle::ui::{draw_ui, App};

fn main() -> Result<()> {
    let config = Config::parse();
    let catalog = config.load_catalog()?;
    let start = config.start_index(&catalog)?;
    let hints = config.hint_provider(&catalog);

    let runtime = tokio::runtime::Runtime::new()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        catalog,
        start,
        hints,
        runtime.handle().clone(),
        config.hint_timeout(),
    );
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result?;

    if app.played() > 0 {
        println!(
            "\nYou squashed {} of {} bugs this session.\n",
            app.solved(),
            app.played()
        );
    }

    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        // Poll so a finished AI hint shows up without a key press
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        app.poll_hint();

        if app.should_quit() {
            return Ok(());
        }
    }
}
