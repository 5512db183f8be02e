//! Pacing intervals for the capture and render loops.
//!
//! The producer throttle, the renderer idle sleep and the retry backoff for
//! live sources are all plain data so they can come from the config file or
//! the command line.

use std::time::Duration;

/// Default pause between frame reads (about 25 fps).
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(40);

/// Default renderer sleep when no frame is waiting.
pub const DEFAULT_IDLE: Duration = Duration::from_millis(20);

/// Base delay for exponential backoff on live source failures.
pub const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(100);

/// Maximum delay cap for exponential backoff.
pub const DEFAULT_RETRY_MAX: Duration = Duration::from_secs(2);

/// Loop timing shared by the producer and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Minimum time between two frame reads
    pub throttle: Duration,
    /// Renderer sleep when the handoff is empty
    pub idle: Duration,
    /// First retry delay for a failing live source
    pub retry_base: Duration,
    /// Upper bound for retry delays
    pub retry_max: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            throttle: DEFAULT_THROTTLE,
            idle: DEFAULT_IDLE,
            retry_base: DEFAULT_RETRY_BASE,
            retry_max: DEFAULT_RETRY_MAX,
        }
    }
}

impl Schedule {
    /// Use a target frame rate instead of the throttle interval.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.throttle = throttle_for_fps(fps);
        self
    }

    /// Pace reads to a media frame rate such as 29.97.
    ///
    /// Rates that are not finite and positive leave the throttle unchanged.
    pub fn with_rate(mut self, fps: f64) -> Self {
        if let Some(throttle) = throttle_for_rate(fps) {
            self.throttle = throttle;
        }
        self
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.retry_base, self.retry_max)
    }

    /// Time left to sleep after spending `elapsed` on a read.
    pub fn throttle_remaining(&self, elapsed: Duration) -> Duration {
        self.throttle.saturating_sub(elapsed)
    }
}

/// Frame interval for a target rate. Zero fps falls back to the default.
pub fn throttle_for_fps(fps: u32) -> Duration {
    if fps == 0 {
        return DEFAULT_THROTTLE;
    }
    Duration::from_micros(1_000_000 / u64::from(fps))
}

/// Frame interval for a fractional rate, or `None` for a nonsense rate.
pub fn throttle_for_rate(fps: f64) -> Option<Duration> {
    if !fps.is_finite() || fps <= 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(1.0 / fps))
}

/// Exponential backoff: `min(base * 2^attempt, max)`.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(max)
}
