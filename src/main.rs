use std::io;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use stepform::config::AppConfig;
use stepform::core::logging;
use stepform::tui::{app::App, form};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();

    // Logs go to file only; stdout belongs to the terminal UI
    let _log_guard = logging::init_tui(&config.logging);
    log::info!("{} v{} starting", stepform::NAME, stepform::VERSION);

    let wizard = form::build(&config.demo)?;
    let mut app = App::new(wizard);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "TUI exited with error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if app.wizard().is_completed() {
        println!(
            "{}",
            serde_json::to_string_pretty(&app.wizard().values().to_json())?
        );
    }

    log::info!("{} exiting", stepform::NAME);
    Ok(())
}
