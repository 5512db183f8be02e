//! Background frame producer.
//!
//! Pulls frames from a [`FrameSource`] on a dedicated thread, independent of
//! the render cadence, and deposits them in the shared [`FrameHandoff`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::handoff::FrameHandoff;
use crate::schedule::Schedule;
use crate::source::{mirror_horizontal, FrameSource, Resolution, SourceError, SourceKind};

/// Longest single sleep, so a stop request is noticed promptly.
const STOP_POLL: Duration = Duration::from_millis(10);

/// Settings applied by the capture thread.
#[derive(Debug, Clone, Default)]
pub struct ProducerOptions {
    /// Resolution hint passed to `FrameSource::configure`
    pub resolution: Option<Resolution>,
    /// Mirror frames horizontally (selfie mode)
    pub mirror: bool,
    /// Throttle and retry timing
    pub schedule: Schedule,
    /// Replace the throttle with the source's own frame rate when it
    /// reports one
    pub follow_source_rate: bool,
}

/// Why the capture loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Stop was requested
    Stopped,
    /// A file source ran out of frames
    EndOfStream,
    /// A file source failed to read
    Failed,
}

/// Sleep for `duration`, waking early if `stop` is set.
fn sleep_unless_stopped(stop: &AtomicBool, duration: Duration) {
    let deadline = Instant::now() + duration;
    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(STOP_POLL));
    }
}

/// Run the capture loop until stopped or a file source ends.
///
/// Live sources never end the loop on their own: failures and empty reads
/// are retried with exponential backoff. While the handoff is paused no
/// frames are read, so a file resumes where it stopped.
pub fn run_capture_loop<S: FrameSource + ?Sized>(
    source: &mut S,
    handoff: &FrameHandoff,
    stop: &AtomicBool,
    options: &ProducerOptions,
) -> LoopExit {
    let schedule = &options.schedule;
    let mut failures = 0u32;

    while !stop.load(Ordering::Relaxed) {
        if handoff.is_paused() {
            sleep_unless_stopped(stop, STOP_POLL);
            continue;
        }
        let started = Instant::now();

        match source.read() {
            Ok(Some(mut frame)) => {
                failures = 0;
                if options.mirror {
                    mirror_horizontal(&mut frame);
                }
                if handoff.push(frame) {
                    log::trace!("Dropped a frame the renderer never took");
                }
            }
            Ok(None) => match source.kind() {
                SourceKind::File => {
                    log::info!("{} reached end of stream", source.describe());
                    return LoopExit::EndOfStream;
                }
                SourceKind::Live => {
                    let delay = schedule.retry_delay(failures);
                    failures = failures.saturating_add(1);
                    log::debug!("{} returned no frame, retrying in {:?}", source.describe(), delay);
                    sleep_unless_stopped(stop, delay);
                    continue;
                }
            },
            Err(e) => match source.kind() {
                SourceKind::File => {
                    log::error!("Failed to read from {}: {}", source.describe(), e);
                    return LoopExit::Failed;
                }
                SourceKind::Live => {
                    let delay = schedule.retry_delay(failures);
                    failures = failures.saturating_add(1);
                    log::warn!(
                        "Failed to read from {} (attempt {}): {}. Retrying in {:?}",
                        source.describe(),
                        failures,
                        e,
                        delay
                    );
                    sleep_unless_stopped(stop, delay);
                    continue;
                }
            },
        }

        sleep_unless_stopped(stop, schedule.throttle_remaining(started.elapsed()));
    }

    LoopExit::Stopped
}

/// Handle to the running capture thread.
///
/// The source is opened on the capture thread, so camera handles that are
/// not `Send` never cross threads. Dropping the handle stops the thread and
/// releases the source.
pub struct FrameProducer {
    /// Capture thread handle
    capture_thread: Option<JoinHandle<LoopExit>>,
    /// Signal to stop capture thread
    stop_signal: Arc<AtomicBool>,
    /// Label of the opened source
    source_label: String,
    /// Kind of the opened source
    source_kind: SourceKind,
}

impl std::fmt::Debug for FrameProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameProducer")
            .field("source", &self.source_label)
            .field("kind", &self.source_kind)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FrameProducer {
    /// Open a source on a new capture thread and start producing frames.
    ///
    /// Blocks until the thread reports whether the source opened, so open
    /// failures (missing ffmpeg, unknown camera) surface here instead of as
    /// an empty preview.
    ///
    /// # Errors
    /// * Whatever `open`, `FrameSource::start` return
    /// * `SourceError::Io` - if the thread cannot be spawned
    /// * `SourceError::ThreadExited` - if the thread dies before reporting
    pub fn spawn<F, S>(
        open: F,
        handoff: Arc<FrameHandoff>,
        options: ProducerOptions,
    ) -> Result<Self, SourceError>
    where
        F: FnOnce() -> Result<S, SourceError> + Send + 'static,
        S: FrameSource + 'static,
    {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop = Arc::clone(&stop_signal);

        // Channel to receive the opened source's label and kind from the thread
        let (info_tx, info_rx) = mpsc::channel::<Result<(String, SourceKind), SourceError>>();

        let handle = thread::Builder::new()
            .name("frame-producer".to_string())
            .spawn(move || {
                let mut options = options;
                let prepared = open().and_then(|mut source| {
                    if let Some(resolution) = options.resolution {
                        source.configure(resolution);
                    }
                    source.start().map(|()| source)
                });
                let mut source = match prepared {
                    Ok(source) => source,
                    Err(e) => {
                        handoff.close();
                        let _ = info_tx.send(Err(e));
                        return LoopExit::Failed;
                    }
                };
                if options.follow_source_rate {
                    if let Some(fps) = source.native_fps() {
                        log::info!("Pacing {} at its native {:.2} fps", source.describe(), fps);
                        options.schedule = options.schedule.with_rate(fps);
                    }
                }
                let _ = info_tx.send(Ok((source.describe(), source.kind())));

                let exit = run_capture_loop(&mut source, &handoff, &stop, &options);
                handoff.close();
                let stats = handoff.stats();
                log::info!(
                    "Capture loop exited ({:?}): {} frames pushed, {} dropped",
                    exit,
                    stats.pushed,
                    stats.dropped
                );
                exit
            })?;

        match info_rx.recv() {
            Ok(Ok((source_label, source_kind))) => {
                log::info!("Capturing from {}", source_label);
                Ok(Self {
                    capture_thread: Some(handle),
                    stop_signal,
                    source_label,
                    source_kind,
                })
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(SourceError::ThreadExited)
            }
        }
    }

    /// Label of the source being captured.
    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    /// Kind of the source being captured.
    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// Check if the capture thread is currently running.
    pub fn is_running(&self) -> bool {
        self.capture_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Stop the capture thread and wait for it to release the source.
    ///
    /// Returns how the loop ended, or `None` if it was already stopped.
    pub fn stop(&mut self) -> Option<LoopExit> {
        self.stop_signal.store(true, Ordering::SeqCst);
        self.capture_thread.take().and_then(|h| h.join().ok())
    }
}

impl Drop for FrameProducer {
    fn drop(&mut self) {
        self.stop();
    }
}
