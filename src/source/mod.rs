//! Frame sources: everything that can hand the producer RGB frames.
//!
//! - [`FfmpegSource`] decodes video files through an ffmpeg child process
//! - [`ImageSource`] replays a decoded image or loops an animated GIF
//! - `CameraSource` captures from a webcam (requires the `camera` feature)
//!
//! [`open`] picks the right one from a command-line input string.

#[cfg(feature = "camera")]
mod camera;
mod ffmpeg;
mod frame_utils;
mod picture;
mod types;

use std::path::Path;

#[cfg(feature = "camera")]
pub use camera::{list_devices, CameraInfo, CameraSource};
pub use ffmpeg::{decoder_args, parse_frame_rate, parse_probe_output, probe_stream, FfmpegSource, StreamInfo};
pub use frame_utils::mirror_horizontal;
pub use picture::{is_image_path, rate_from_delays, ImageSource, IMAGE_EXTENSIONS};
pub use types::{Frame, Resolution, SourceError, SourceKind};

/// A decodable video or camera input.
///
/// Sources are driven from a single capture thread: `configure` and `start`
/// run once, then `read` is called repeatedly until it reports end of stream
/// or the producer is stopped.
pub trait FrameSource {
    /// Best-effort resolution hint. Sources may ignore it.
    fn configure(&mut self, resolution: Resolution);

    /// Acquire the underlying decoder or device.
    ///
    /// `read` starts the source lazily if this was never called, but calling
    /// it up front surfaces open errors before the first frame is due.
    fn start(&mut self) -> Result<(), SourceError> {
        Ok(())
    }

    /// Read the next frame. `Ok(None)` means end of stream.
    fn read(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Whether failures are final (files) or transient (live devices).
    fn kind(&self) -> SourceKind;

    /// Frame rate the media is meant to play at, if the source knows it.
    ///
    /// Only meaningful after `start`.
    fn native_fps(&self) -> Option<f64> {
        None
    }

    /// Short human-readable label for logs.
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn configure(&mut self, resolution: Resolution) {
        (**self).configure(resolution)
    }

    fn start(&mut self) -> Result<(), SourceError> {
        (**self).start()
    }

    fn read(&mut self) -> Result<Option<Frame>, SourceError> {
        (**self).read()
    }

    fn kind(&self) -> SourceKind {
        (**self).kind()
    }

    fn native_fps(&self) -> Option<f64> {
        (**self).native_fps()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// What an input string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Camera device index
    Camera(u32),
    /// Image file, still or animated
    Image(String),
    /// Anything ffmpeg can decode
    Video(String),
}

impl InputKind {
    /// Classify an input: all digits is a camera index, a known image
    /// extension is an image, everything else goes to ffmpeg.
    pub fn classify(input: &str) -> Self {
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = input.parse() {
                return InputKind::Camera(index);
            }
        }
        if is_image_path(Path::new(input)) {
            InputKind::Image(input.to_string())
        } else {
            InputKind::Video(input.to_string())
        }
    }
}

/// Open the source an input string refers to.
///
/// Opening is cheap: decoders and devices are acquired by `start()`.
pub fn open(input: &str) -> Result<Box<dyn FrameSource>, SourceError> {
    match InputKind::classify(input) {
        InputKind::Camera(index) => open_camera(index),
        InputKind::Image(path) => Ok(Box::new(ImageSource::open(Path::new(&path))?)),
        InputKind::Video(path) => Ok(Box::new(FfmpegSource::new(path))),
    }
}

#[cfg(feature = "camera")]
fn open_camera(index: u32) -> Result<Box<dyn FrameSource>, SourceError> {
    Ok(Box::new(CameraSource::new(index)))
}

#[cfg(not(feature = "camera"))]
fn open_camera(index: u32) -> Result<Box<dyn FrameSource>, SourceError> {
    Err(SourceError::CameraUnsupported(index))
}
