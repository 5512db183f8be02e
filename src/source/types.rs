//! Frame source types and data structures.

use std::fmt;
use std::time::Instant;

/// Frame resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Low resolution (320x240) - fast, coarse preview
    pub const LOW: Resolution = Resolution {
        width: 320,
        height: 240,
    };

    /// Medium resolution (640x480)
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// Preview resolution (960x720) - the default capture hint
    pub const PREVIEW: Resolution = Resolution {
        width: 960,
        height: 720,
    };
}

impl Default for Resolution {
    fn default() -> Self {
        Self::PREVIEW
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A captured RGB frame.
///
/// Frames move through the pipeline by value: the producer hands ownership
/// to the handoff, the renderer takes it back out and drops it once drawn.
#[derive(Debug)]
pub struct Frame {
    /// Raw pixel data, RGB24, row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Bytes per RGB24 pixel.
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Wrap an RGB24 buffer captured now.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: Instant::now(),
        }
    }

    /// Build a frame where every pixel has the same gray level.
    pub fn filled(width: u32, height: u32, level: u8) -> Self {
        let len = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        Self::new(vec![level; len], width, height)
    }

    /// Expected buffer length for the tagged dimensions.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }

    /// True when the buffer holds every pixel the dimensions promise.
    pub fn is_complete(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() >= self.expected_len()
    }

    /// Duplicate the pixel data into a new frame stamped now.
    ///
    /// Only sources that replay a single image need this; the pipeline itself
    /// never clones frames.
    pub fn duplicate(&self) -> Self {
        Self::new(self.data.clone(), self.width, self.height)
    }
}

/// How a source behaves once it stops yielding frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Finite input (video or image file). End of stream is final.
    File,
    /// Live device. Failures are transient and retried with backoff.
    Live,
}

/// Errors that can occur while opening or reading a frame source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// ffmpeg / ffprobe executable not found
    #[error("FFmpeg not found. Install ffmpeg (which provides ffprobe) and make sure it is on PATH")]
    FfmpegNotFound,
    /// Failed to spawn the decoder process
    #[error("Failed to spawn {program}: {source}")]
    SpawnFailed {
        program: &'static str,
        source: std::io::Error,
    },
    /// ffprobe could not report the stream dimensions
    #[error("Failed to probe '{input}': {reason}")]
    ProbeFailed { input: String, reason: String },
    /// I/O error while reading frames
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Image could not be decoded
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// Image decoded but held no frames
    #[error("Image '{0}' contains no frames")]
    NoFrames(String),
    /// No camera at the requested index
    #[error("Camera device {0} not found. Run 'list-cameras' to see available devices")]
    DeviceNotFound(u32),
    /// Camera could not be opened or streamed
    #[error("Camera error: {0}")]
    Camera(String),
    /// Camera permission denied (macOS)
    #[error("Camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera")]
    PermissionDenied,
    /// Camera input requested but the crate was built without it
    #[error("Camera input '{0}' requires building with the `camera` feature")]
    CameraUnsupported(u32),
    /// Producer thread exited before reporting whether the source opened
    #[error("Capture thread terminated unexpectedly")]
    ThreadExited,
}
