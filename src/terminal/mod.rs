//! Terminal management: screen abstraction, TUI guard and panic-safe cleanup.

mod raw_mode;
mod screen;
mod tui;

pub use screen::{Screen, TerminalScreen};
pub use tui::{StdoutScreen, Tui};
