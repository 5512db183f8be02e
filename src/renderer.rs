//! Terminal render loop.
//!
//! Each tick reads the screen size, takes the newest frame from the handoff
//! if there is one and paints it. The renderer never waits on the producer:
//! an empty handoff means the tick idles.
//!
//! The last painted frame is kept so a resize can be answered even when no
//! new frame is coming (paused, or the file has ended).

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::ascii::{AsciiFrame, Rasterizer, RenderConfig};
use crate::handoff::FrameHandoff;
use crate::input::{InputSource, KeyAction};
use crate::schedule::DEFAULT_IDLE;
use crate::source::Frame;
use crate::terminal::Screen;

/// Outcome of one render tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A new frame was painted
    Drew,
    /// The screen size changed and the last frame was painted again
    Redrew,
    /// A frame was taken but rasterized to nothing (screen too small)
    Skipped,
    /// No frame was waiting, or playback is paused
    Idle,
    /// The producer closed the handoff and every frame has been taken
    Finished,
}

/// Why [`Renderer::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// The shutdown flag was set
    Shutdown,
    /// The user pressed a quit key
    Quit,
    /// The stream ended and `exit_on_end` was requested
    EndOfStream,
}

/// Paints frames from a [`FrameHandoff`] onto a [`Screen`].
pub struct Renderer<S: Screen> {
    screen: S,
    handoff: Arc<FrameHandoff>,
    rasterizer: Rasterizer,
    /// Settings applied every tick; the target size is replaced by the
    /// current screen size
    config: RenderConfig,
    idle: Duration,
    last_size: Option<(u16, u16)>,
    /// Most recent frame taken from the handoff, kept for redraws
    last_frame: Option<Frame>,
    frames_drawn: u64,
}

impl<S: Screen> Renderer<S> {
    /// Create a renderer painting onto `screen`.
    ///
    /// # Arguments
    /// * `screen` - Where glyph blocks are painted
    /// * `handoff` - Shared slot the producer fills
    /// * `rasterizer` - Frame to glyph conversion with a fixed ramp
    /// * `config` - Sampling, stride and invert settings; the target size is
    ///   replaced by the screen size on every tick
    pub fn new(
        screen: S,
        handoff: Arc<FrameHandoff>,
        rasterizer: Rasterizer,
        config: RenderConfig,
    ) -> Self {
        Self {
            screen,
            handoff,
            rasterizer,
            config,
            idle: DEFAULT_IDLE,
            last_size: None,
            last_frame: None,
            frames_drawn: 0,
        }
    }

    /// Sleep used between ticks when no frame is waiting.
    pub fn with_idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    /// New frames painted so far; redraws are not counted.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    /// Run one tick.
    ///
    /// # Errors
    /// Returns an error if the screen size cannot be read or painting fails.
    pub fn tick(&mut self) -> io::Result<Tick> {
        let (rows, cols) = self.screen.size()?;
        let resized = self.last_size != Some((rows, cols));
        if resized {
            log::debug!("Screen size {}x{}", cols, rows);
            self.last_size = Some((rows, cols));
        }

        if !self.handoff.is_paused() {
            if let Some(frame) = self.handoff.try_pop() {
                let painted = self.draw(&frame, cols, rows);
                self.last_frame = Some(frame);
                if !painted? {
                    return Ok(Tick::Skipped);
                }
                self.frames_drawn += 1;
                return Ok(Tick::Drew);
            }
        }

        if resized {
            if let Some(frame) = self.last_frame.take() {
                let painted = self.draw(&frame, cols, rows);
                self.last_frame = Some(frame);
                if painted? {
                    return Ok(Tick::Redrew);
                }
            }
        }

        Ok(if self.handoff.is_finished() {
            Tick::Finished
        } else {
            Tick::Idle
        })
    }

    /// Rasterize at the given size and paint. `Ok(false)` when the block is
    /// empty and nothing was painted.
    fn draw(&mut self, frame: &Frame, cols: u16, rows: u16) -> io::Result<bool> {
        let config = self.config.with_target(cols, rows);
        let block = self.rasterizer.rasterize(frame, &config);
        if block.is_empty() {
            return Ok(false);
        }
        self.paint(&block)?;
        Ok(true)
    }

    fn paint(&mut self, block: &AsciiFrame) -> io::Result<()> {
        self.screen.clear();
        self.screen.write_text(0, 0, &block.to_text());
        self.screen.refresh()
    }

    /// Tick until shutdown, a quit key or (with `exit_on_end`) the end of the
    /// stream.
    ///
    /// A quit key also sets `shutdown` so the rest of the process winds down.
    /// The pause key flips the handoff's pause flag.
    pub fn run<I: InputSource + ?Sized>(
        &mut self,
        shutdown: &AtomicBool,
        input: &mut I,
        exit_on_end: bool,
    ) -> io::Result<RunExit> {
        let mut reported_end = false;
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return Ok(RunExit::Shutdown);
            }
            match input.poll_action()? {
                KeyAction::Quit => {
                    shutdown.store(true, Ordering::SeqCst);
                    return Ok(RunExit::Quit);
                }
                KeyAction::TogglePause => {
                    if self.handoff.toggle_paused() {
                        log::info!("Paused");
                    } else {
                        log::info!("Resumed");
                    }
                }
                KeyAction::None => {}
            }

            match self.tick()? {
                Tick::Drew | Tick::Redrew | Tick::Skipped => {}
                Tick::Idle => thread::sleep(self.idle),
                Tick::Finished => {
                    if exit_on_end {
                        return Ok(RunExit::EndOfStream);
                    }
                    if !reported_end {
                        log::info!(
                            "Stream ended after {} frames; waiting for quit",
                            self.frames_drawn
                        );
                        reported_end = true;
                    }
                    thread::sleep(self.idle);
                }
            }
        }
    }
}
