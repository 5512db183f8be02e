//! Single-slot frame handoff between the capture thread and the renderer.
//!
//! The producer overwrites whatever frame is still waiting; the renderer takes
//! the newest frame or nothing. Neither side ever waits for the other, and at
//! most one undelivered frame is buffered.
//!
//! The handoff also carries the playback pause flag, since it is the only
//! state the two sides share.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::source::Frame;

/// Counters describing how frames moved through the handoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandoffStats {
    /// Frames pushed by the producer
    pub pushed: u64,
    /// Frames replaced before the renderer took them
    pub dropped: u64,
    /// Frames taken by the renderer
    pub delivered: u64,
}

#[derive(Debug, Default)]
struct Slot {
    frame: Option<Frame>,
    closed: bool,
    stats: HandoffStats,
}

/// Latest-frame-wins transport between producer and renderer.
#[derive(Debug, Default)]
pub struct FrameHandoff {
    slot: Mutex<Slot>,
    paused: AtomicBool,
}

impl FrameHandoff {
    /// Create an empty, open handoff.
    pub fn new() -> Self {
        Self::default()
    }

    // A panic on the other side must not wedge the pipeline; the slot holds no
    // invariants a half-finished update could break.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deposit a frame, replacing any frame the renderer has not taken yet.
    ///
    /// Returns `true` if an older frame was dropped.
    pub fn push(&self, frame: Frame) -> bool {
        let stale = {
            let mut slot = self.lock();
            slot.stats.pushed += 1;
            let stale = slot.frame.replace(frame);
            if stale.is_some() {
                slot.stats.dropped += 1;
            }
            stale
        };
        // Released outside the lock
        let dropped = stale.is_some();
        drop(stale);
        dropped
    }

    /// Take the newest frame if one is waiting. Never blocks on the producer.
    pub fn try_pop(&self) -> Option<Frame> {
        let mut slot = self.lock();
        let frame = slot.frame.take();
        if frame.is_some() {
            slot.stats.delivered += 1;
        }
        frame
    }

    /// Mark the stream as ended. A frame already waiting is still delivered.
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// Whether the producer has closed the handoff.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// True once the handoff is closed and its last frame has been taken.
    pub fn is_finished(&self) -> bool {
        let slot = self.lock();
        slot.closed && slot.frame.is_none()
    }

    /// Whether a frame is waiting.
    pub fn has_frame(&self) -> bool {
        self.lock().frame.is_some()
    }

    /// Pause or resume playback. The producer stops reading while paused.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }

    /// Flip the pause flag, returning the new state.
    pub fn toggle_paused(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Snapshot of the transfer counters.
    pub fn stats(&self) -> HandoffStats {
        self.lock().stats
    }
}
