//! Raw-mode terminal session.
//!
//! The terminal is restored when the session is dropped, on every exit path:
//! normal return, an early `?`, or unwinding from a panic.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// Runs `restore` once when dropped
pub struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    _restore: RestoreGuard<fn()>,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen. If any step fails, whatever
    /// was already switched on is switched back off.
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let restore = RestoreGuard::new(restore_terminal as fn());

        execute!(io::stdout(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        // Leave the alternate screen before the panic message is printed
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));

        Ok(Self {
            terminal,
            _restore: restore,
        })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}
