//! End-to-end tests for the capture-to-screen pipeline.
//!
//! A scripted source feeds the real producer thread; the real renderer paints
//! onto a ratatui `TestBackend`, so no TTY, camera or ffmpeg is needed.

use ascii_preview::ascii::{Rasterizer, RenderConfig};
use ascii_preview::handoff::FrameHandoff;
use ascii_preview::input::NoInput;
use ascii_preview::producer::{FrameProducer, LoopExit, ProducerOptions};
use ascii_preview::renderer::{Renderer, RunExit, Tick};
use ascii_preview::schedule::Schedule;
use ascii_preview::source::{
    Frame, FrameSource, ImageSource, Resolution, SourceError, SourceKind,
};
use ascii_preview::terminal::{Screen, TerminalScreen};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Source that plays back a fixed script of read results.
struct ScriptedSource {
    script: VecDeque<Result<Option<Frame>, SourceError>>,
    kind: SourceKind,
    configured: Arc<Mutex<Option<Resolution>>>,
}

impl ScriptedSource {
    fn file(frames: Vec<Frame>) -> Self {
        Self {
            script: frames.into_iter().map(|f| Ok(Some(f))).collect(),
            kind: SourceKind::File,
            configured: Arc::default(),
        }
    }
}

impl FrameSource for ScriptedSource {
    fn configure(&mut self, resolution: Resolution) {
        *self.configured.lock().unwrap() = Some(resolution);
    }

    fn read(&mut self) -> Result<Option<Frame>, SourceError> {
        match self.kind {
            SourceKind::File => self.script.pop_front().unwrap_or(Ok(None)),
            // Live sources keep yielding the last scripted result
            SourceKind::Live => match self.script.pop_front() {
                Some(result) => result,
                None => Ok(Some(Frame::filled(64, 64, 255))),
            },
        }
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn fast_options() -> ProducerOptions {
    ProducerOptions {
        schedule: Schedule {
            throttle: Duration::from_millis(1),
            idle: Duration::from_millis(1),
            retry_base: Duration::from_millis(1),
            retry_max: Duration::from_millis(4),
        },
        ..ProducerOptions::default()
    }
}

fn test_screen(cols: u16, rows: u16) -> TerminalScreen<TestBackend> {
    TerminalScreen::new(Terminal::new(TestBackend::new(cols, rows)).unwrap())
}

fn screen_lines(screen: &TerminalScreen<TestBackend>) -> Vec<String> {
    let buffer = screen.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        })
        .collect()
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}

// ==================== Rendering Tests ====================

#[test]
fn test_white_frame_fills_screen() {
    let handoff = Arc::new(FrameHandoff::new());
    let mut renderer = Renderer::new(
        test_screen(16, 8),
        Arc::clone(&handoff),
        Rasterizer::default(),
        RenderConfig::default(),
    );
    handoff.push(Frame::filled(64, 64, 255));
    assert_eq!(renderer.tick().unwrap(), Tick::Drew);
    assert_eq!(screen_lines(renderer.screen()), vec!["@".repeat(16); 8]);
}

#[test]
fn test_resize_between_ticks() {
    let handoff = Arc::new(FrameHandoff::new());
    let mut screen = test_screen(80, 24);
    let mut renderer = Renderer::new(
        &mut screen,
        Arc::clone(&handoff),
        Rasterizer::default(),
        RenderConfig::default(),
    );

    handoff.push(Frame::filled(960, 720, 255));
    assert_eq!(renderer.tick().unwrap(), Tick::Drew);
    let lines = screen_lines(renderer.screen());
    assert_eq!(lines.len(), 24);
    assert!(lines.iter().all(|l| l == &"@".repeat(80)));

    // Same renderer, new size: the next tick must pick it up
    renderer.screen_mut().backend_mut().resize(40, 12);
    handoff.push(Frame::filled(960, 720, 255));
    assert_eq!(renderer.tick().unwrap(), Tick::Drew);
    drop(renderer);

    assert_eq!(screen.size().unwrap(), (12, 40));
    let lines = screen_lines(&screen);
    assert_eq!(lines.len(), 12);
    assert!(lines.iter().all(|l| l == &"@".repeat(40)));
}

#[test]
fn test_resize_after_end_repaints_last_frame() {
    let handoff = Arc::new(FrameHandoff::new());
    let mut renderer = Renderer::new(
        test_screen(80, 24),
        Arc::clone(&handoff),
        Rasterizer::default(),
        RenderConfig::default(),
    );
    handoff.push(Frame::filled(960, 720, 255));
    handoff.close();
    assert_eq!(renderer.tick().unwrap(), Tick::Drew);
    assert_eq!(renderer.tick().unwrap(), Tick::Finished);

    renderer.screen_mut().backend_mut().resize(40, 12);
    assert_eq!(renderer.tick().unwrap(), Tick::Redrew);
    assert_eq!(screen_lines(renderer.screen()), vec!["@".repeat(40); 12]);
}

// ==================== Producer Tests ====================

#[test]
fn test_file_source_plays_to_end() {
    let handoff = Arc::new(FrameHandoff::new());
    let frames = vec![
        Frame::filled(64, 64, 0),
        Frame::filled(64, 64, 128),
        Frame::filled(64, 64, 255),
    ];
    let mut producer = FrameProducer::spawn(
        move || Ok(ScriptedSource::file(frames)),
        Arc::clone(&handoff),
        fast_options(),
    )
    .unwrap();
    assert_eq!(producer.source_kind(), SourceKind::File);

    let mut renderer = Renderer::new(
        test_screen(16, 8),
        Arc::clone(&handoff),
        Rasterizer::default(),
        RenderConfig::default(),
    )
    .with_idle(Duration::from_millis(1));
    let shutdown = AtomicBool::new(false);
    let exit = renderer.run(&shutdown, &mut NoInput, true).unwrap();

    assert_eq!(exit, RunExit::EndOfStream);
    assert!(renderer.frames_drawn() >= 1);
    // Whatever was dropped, the final frame always reaches the screen
    assert_eq!(screen_lines(renderer.screen()), vec!["@".repeat(16); 8]);
    assert_eq!(producer.stop(), Some(LoopExit::EndOfStream));
    assert_eq!(handoff.stats().pushed, 3);
}

#[test]
fn test_resolution_hint_reaches_source() {
    let handoff = Arc::new(FrameHandoff::new());
    let configured = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&configured);
    let mut options = fast_options();
    options.resolution = Some(Resolution::LOW);

    let mut producer = FrameProducer::spawn(
        move || {
            let mut source = ScriptedSource::file(Vec::new());
            source.configured = seen;
            Ok(source)
        },
        handoff,
        options,
    )
    .unwrap();
    producer.stop();
    assert_eq!(*configured.lock().unwrap(), Some(Resolution::LOW));
}

#[test]
fn test_open_failure_is_reported() {
    let handoff = Arc::new(FrameHandoff::new());
    let result = FrameProducer::spawn(
        || -> Result<ScriptedSource, SourceError> { Err(SourceError::FfmpegNotFound) },
        Arc::clone(&handoff),
        fast_options(),
    );
    assert!(matches!(result, Err(SourceError::FfmpegNotFound)));
    assert!(handoff.is_finished());
}

#[test]
fn test_live_source_retries_after_errors() {
    let handoff = Arc::new(FrameHandoff::new());
    let source = ScriptedSource {
        script: VecDeque::from(vec![
            Err(SourceError::Camera("glitch".to_string())),
            Ok(None),
            Err(SourceError::Camera("glitch".to_string())),
        ]),
        kind: SourceKind::Live,
        configured: Arc::default(),
    };
    let mut producer =
        FrameProducer::spawn(move || Ok(source), Arc::clone(&handoff), fast_options()).unwrap();

    assert!(wait_until(Duration::from_secs(5), || handoff.has_frame()));
    assert!(!handoff.is_closed());
    assert!(producer.is_running());
    assert_eq!(producer.stop(), Some(LoopExit::Stopped));
}

#[test]
fn test_stop_is_prompt_with_slow_throttle() {
    let handoff = Arc::new(FrameHandoff::new());
    let mut options = fast_options();
    options.schedule.throttle = Duration::from_secs(30);
    let mut producer = FrameProducer::spawn(
        || Ok(ImageSource::from_frame(Frame::filled(8, 8, 10))),
        Arc::clone(&handoff),
        options,
    )
    .unwrap();

    assert!(wait_until(Duration::from_secs(5), || handoff.has_frame()));
    let started = Instant::now();
    assert_eq!(producer.stop(), Some(LoopExit::Stopped));
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(handoff.is_closed());
}

#[test]
fn test_mirror_applies_to_frames() {
    let handoff = Arc::new(FrameHandoff::new());
    // Left pixel black, right pixel white
    let frame = Frame::new(vec![0, 0, 0, 255, 255, 255], 2, 1);
    let mut options = fast_options();
    options.mirror = true;
    let mut producer = FrameProducer::spawn(
        move || Ok(ScriptedSource::file(vec![frame])),
        Arc::clone(&handoff),
        options,
    )
    .unwrap();

    assert!(wait_until(Duration::from_secs(5), || handoff.is_closed()));
    producer.stop();
    let frame = handoff.try_pop().unwrap();
    assert_eq!(frame.data, vec![255, 255, 255, 0, 0, 0]);
}
