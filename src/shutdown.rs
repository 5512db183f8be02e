//! Process-wide cooperative shutdown flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global flag for handling Ctrl+C and SIGTERM across the application
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// The flag itself, for loops that take `&AtomicBool`.
pub fn flag() -> &'static AtomicBool {
    &SHUTDOWN_REQUESTED
}

/// Check if shutdown has been requested.
pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::SeqCst)
}

/// Request shutdown, e.g. from the quit key.
pub fn request_shutdown() {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Set up the Ctrl+C / SIGTERM handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        log::info!("Received termination signal, shutting down");
        request_shutdown();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_sets_flag() {
        request_shutdown();
        assert!(shutdown_requested());
        assert!(flag().load(Ordering::SeqCst));
    }
}
