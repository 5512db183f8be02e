//! TUI wrapper that manages the ratatui terminal with crossterm backend.

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::atomic::Ordering;

use super::raw_mode::{install_panic_hook, RAW_MODE_ACTIVE};
use super::screen::TerminalScreen;

/// Screen type backed by the real terminal.
pub type StdoutScreen = TerminalScreen<CrosstermBackend<Stdout>>;

/// Owns the terminal while the preview runs.
///
/// This struct handles:
/// - Entering raw mode and alternate screen on creation, hiding the cursor
/// - Restoring terminal state on drop (or explicit restore)
/// - Panic recovery (terminal is restored even if the app panics)
///
/// # Example
///
/// ```ignore
/// let mut tui = Tui::new()?;
/// let mut renderer = Renderer::new(tui.screen(), handoff, rasterizer, config);
/// renderer.run(&shutdown, &mut input, false)?;
/// drop(renderer);
/// tui.restore()?;
/// ```
pub struct Tui {
    screen: StdoutScreen,
    /// Whether this TUI is responsible for cleanup
    active: bool,
}

impl Tui {
    /// Create a new TUI, entering raw mode and alternate screen.
    ///
    /// # Errors
    /// Returns an error if raw mode, the alternate screen or terminal
    /// creation fails. Whatever was already enabled is rolled back.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        let mut stdout = io::stdout();
        if let Err(e) = crossterm::execute!(
            stdout,
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide,
        ) {
            super::raw_mode::emergency_restore();
            return Err(e);
        }

        let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                super::raw_mode::emergency_restore();
                return Err(e);
            }
        };

        Ok(Self {
            screen: TerminalScreen::new(terminal),
            active: true,
        })
    }

    /// The drawable screen.
    pub fn screen(&mut self) -> &mut StdoutScreen {
        &mut self.screen
    }

    /// Restore the terminal to its original state.
    ///
    /// After calling this, the Tui's drop will be a no-op.
    pub fn restore(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);

            let terminal = self.screen.terminal_mut();
            crossterm::execute!(
                terminal.backend_mut(),
                crossterm::terminal::LeaveAlternateScreen,
            )?;
            disable_raw_mode()?;
            terminal.show_cursor()?;
        }
        Ok(())
    }

    /// Check if the TUI is still active (not yet restored).
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            RAW_MODE_ACTIVE.store(false, Ordering::SeqCst);

            // Best-effort cleanup - ignore errors during drop
            let terminal = self.screen.terminal_mut();
            let _ = crossterm::execute!(
                terminal.backend_mut(),
                crossterm::terminal::LeaveAlternateScreen,
            );
            let _ = disable_raw_mode();
            let _ = terminal.show_cursor();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tui_new_and_drop() {
        // Skip test if not running in a terminal (e.g., CI environment)
        match Tui::new() {
            Ok(tui) => {
                assert!(tui.is_active());
                assert!(RAW_MODE_ACTIVE.load(Ordering::SeqCst));
                drop(tui);
                assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }

    #[test]
    fn test_tui_double_restore() {
        match Tui::new() {
            Ok(mut tui) => {
                tui.restore().expect("Should restore terminal");
                assert!(!tui.is_active());

                // Second restore should be a no-op (not an error)
                tui.restore().expect("Second restore should not fail");
                assert!(!tui.is_active());
            }
            Err(e) => {
                eprintln!("Skipping test (no TTY): {}", e);
            }
        }
    }
}
