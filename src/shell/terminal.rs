use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use std::io::{self, Stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Puts the terminal back into cooked mode when dropped, unless
/// [`TerminalGuard::restore`] already did.
pub struct TerminalGuard {
    leave: fn() -> io::Result<()>,
    armed: bool,
}

impl TerminalGuard {
    pub const fn new(leave: fn() -> io::Result<()>) -> Self {
        Self { leave, armed: true }
    }

    /// Restores explicitly so the caller sees the error
    pub fn restore(mut self) -> io::Result<()> {
        self.armed = false;
        (self.leave)()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = (self.leave)();
        }
    }
}

/// Raw mode, alternate screen and mouse capture. The guard is armed as soon
/// as raw mode is on, so a failure further down still restores the terminal.
pub fn enter() -> Result<(TerminalGuard, Tui)> {
    enable_raw_mode().context("enabling raw mode")?;
    let guard = TerminalGuard::new(leave);

    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("entering alternate screen")?;

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = leave();
        hook(panic_info);
    }));

    let terminal = Terminal::new(CrosstermBackend::new(io::stdout())).context("creating terminal")?;
    Ok((guard, terminal))
}

fn leave() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// The loop's error wins over a failed restore
pub fn first_error(outcome: Result<()>, restored: io::Result<()>) -> Result<()> {
    outcome?;
    restored.context("restoring terminal")
}
