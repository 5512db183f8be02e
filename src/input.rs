//! Keyboard input handling.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

/// Result of handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Stop the preview
    Quit,
    /// Pause or resume playback
    TogglePause,
    /// No action needed
    None,
}

/// Map a key event to an action.
///
/// Quit keys: `q`, `Q`, `Esc` and `Ctrl+C` (raw mode swallows SIGINT, so
/// Ctrl+C arrives as a key). Space pauses and resumes.
pub fn handle_key_event(event: KeyEvent) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    match event.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char(' ') => KeyAction::TogglePause,
        _ => KeyAction::None,
    }
}

/// Something the render loop can poll for user actions without blocking.
pub trait InputSource {
    /// Read pending input up to the first key that maps to an action.
    ///
    /// Keys after it stay queued for the next poll.
    fn poll_action(&mut self) -> io::Result<KeyAction>;
}

/// Reads key events from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_action(&mut self) -> io::Result<KeyAction> {
        while event::poll(Duration::ZERO)? {
            // Resize is picked up by polling the screen size each tick
            if let Event::Key(key_event) = event::read()? {
                let action = handle_key_event(key_event);
                if action != KeyAction::None {
                    return Ok(action);
                }
            }
        }
        Ok(KeyAction::None)
    }
}

/// Input source that never produces an action.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll_action(&mut self) -> io::Result<KeyAction> {
        Ok(KeyAction::None)
    }
}
