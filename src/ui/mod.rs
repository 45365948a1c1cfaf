//! Terminal chart display for the restaurant ratings CLI
//!
//! Charts are drawn with ratatui in the alternate screen and stay up until a
//! key is pressed, after which the normal prompt output resumes.

pub mod bar_chart;

pub use bar_chart::{render as render_bar_chart, ChartSpec};

use std::io;
use std::panic;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while showing a chart
#[derive(Debug, Error)]
pub enum ChartError {
    /// Terminal setup, drawing or input failed
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if a panic happens while a chart is shown.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Shows the chart full-screen until a key is pressed
///
/// Once raw mode is on, the terminal is restored on every exit path, including
/// a failure to enter the alternate screen or to create the terminal.
pub fn show_chart(spec: &ChartSpec) -> Result<(), ChartError> {
    debug!(title = %spec.title, "Showing chart");

    run_restoring(
        enable_raw_mode,
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            draw_until_key(&mut terminal, spec)
        },
        restore_terminal,
    )
}

/// Runs `body` after `enter` succeeds, then always runs `restore`
///
/// An error from `body` takes precedence over one from `restore`. When `enter`
/// fails neither of the others runs.
fn run_restoring<T, E>(
    enter: impl FnOnce() -> io::Result<()>,
    body: impl FnOnce() -> Result<T, E>,
    restore: impl FnOnce() -> io::Result<()>,
) -> Result<T, E>
where
    E: From<io::Error>,
{
    enter()?;
    let result = body();
    let restored = restore();

    let value = result?;
    restored?;
    Ok(value)
}

/// Leaves raw mode and the alternate screen, attempting both even if one fails
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, Show);
    raw.and(screen)
}

fn draw_until_key(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    spec: &ChartSpec,
) -> Result<(), ChartError> {
    loop {
        terminal.draw(|frame| render_bar_chart(frame, spec))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(()),
            // Redraw on resize or any other event
            _ => {}
        }
    }
}
