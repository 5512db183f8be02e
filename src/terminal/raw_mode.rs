//! Panic-safe terminal restoration.

use crossterm::terminal::disable_raw_mode;
use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static flag to track if raw mode is active (for panic handler)
pub(crate) static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Leave the alternate screen, show the cursor and disable raw mode, if a
/// [`Tui`](super::Tui) left them enabled. Errors are ignored.
pub(crate) fn emergency_restore() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = crossterm::execute!(
            io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show,
        );
        let _ = disable_raw_mode();
    }
}

/// Install a panic hook that restores terminal state before the panic
/// message is printed. Idempotent.
pub(crate) fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        emergency_restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_hook_installation() {
        install_panic_hook();
        install_panic_hook(); // Second call should be no-op
    }

    #[test]
    fn test_emergency_restore_without_tui_is_noop() {
        // Flag is only set while a Tui is active
        if !RAW_MODE_ACTIVE.load(Ordering::SeqCst) {
            emergency_restore();
            assert!(!RAW_MODE_ACTIVE.load(Ordering::SeqCst));
        }
    }
}
