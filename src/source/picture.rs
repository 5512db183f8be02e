//! Image file source.
//!
//! Decodes the file once and replays it on every read, so the renderer keeps
//! redrawing it and adapts to terminal resizes like any other stream.
//! Animated GIFs are decoded frame by frame and loop forever at the rate
//! their frame delays describe.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat};

use super::types::{Frame, Resolution, SourceError, SourceKind};
use super::FrameSource;

/// File extensions routed to the image source.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check whether a path looks like an image by its extension.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Frame rate implied by a list of frame delays in milliseconds.
///
/// Returns `None` when the delays add up to nothing (many GIFs leave them
/// at zero).
pub fn rate_from_delays(delays_ms: &[f64]) -> Option<f64> {
    let total: f64 = delays_ms.iter().sum();
    if delays_ms.is_empty() || !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(delays_ms.len() as f64 * 1000.0 / total)
}

/// Decode every frame of a GIF, composited to full RGB frames.
fn decode_gif(path: &Path) -> Result<(Vec<Frame>, Option<f64>), SourceError> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
    let decoded = decoder.into_frames().collect_frames()?;

    let mut delays = Vec::with_capacity(decoded.len());
    let mut frames = Vec::with_capacity(decoded.len());
    for frame in decoded {
        let (numer, denom) = frame.delay().numer_denom_ms();
        delays.push(f64::from(numer) / f64::from(denom.max(1)));
        let rgb = DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8();
        let (width, height) = rgb.dimensions();
        frames.push(Frame::new(rgb.into_raw(), width, height));
    }
    Ok((frames, rate_from_delays(&delays)))
}

/// Frame source that loops over the decoded frames of an image forever.
#[derive(Debug)]
pub struct ImageSource {
    frames: Vec<Frame>,
    next: usize,
    fps: Option<f64>,
    label: String,
}

impl ImageSource {
    /// Decode the image at `path` into RGB frames.
    ///
    /// GIFs keep every animation frame; other formats yield one frame.
    ///
    /// # Errors
    /// * `SourceError::Io` - if the file cannot be opened
    /// * `SourceError::Image` - if the file cannot be decoded
    /// * `SourceError::NoFrames` - if an animation holds no frames
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let label = path.display().to_string();
        let (frames, fps) = match ImageFormat::from_path(path) {
            Ok(ImageFormat::Gif) => decode_gif(path)?,
            _ => {
                let rgb = image::open(path)?.to_rgb8();
                let (width, height) = rgb.dimensions();
                (vec![Frame::new(rgb.into_raw(), width, height)], None)
            }
        };
        if frames.is_empty() {
            return Err(SourceError::NoFrames(label));
        }
        // A single frame has nothing to pace
        let fps = if frames.len() > 1 {
            log::info!("Decoded {} animation frames from '{}'", frames.len(), label);
            fps
        } else {
            None
        };
        Ok(Self {
            frames,
            next: 0,
            fps,
            label,
        })
    }

    /// Wrap an already decoded frame.
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            next: 0,
            fps: None,
            label: "in-memory image".to_string(),
        }
    }

    /// Number of distinct frames the source cycles through.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ImageSource {
    /// Images keep their native size; the hint is ignored.
    fn configure(&mut self, _resolution: Resolution) {}

    fn read(&mut self) -> Result<Option<Frame>, SourceError> {
        let Some(frame) = self.frames.get(self.next) else {
            return Ok(None);
        };
        let frame = frame.duplicate();
        self.next = (self.next + 1) % self.frames.len();
        Ok(Some(frame))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn native_fps(&self) -> Option<f64> {
        self.fps
    }

    fn describe(&self) -> String {
        format!("image '{}'", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Rgba, RgbaImage};

    fn write_two_frame_gif(path: &Path) {
        let solid = |level: u8| {
            image::Frame::from_parts(
                RgbaImage::from_pixel(4, 4, Rgba([level, level, level, 255])),
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            )
        };
        let mut encoder = GifEncoder::new(File::create(path).unwrap());
        encoder.set_repeat(Repeat::Infinite).unwrap();
        encoder.encode_frames(vec![solid(0), solid(255)]).unwrap();
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("homer.jpg")));
        assert!(is_image_path(Path::new("photo.PNG")));
        assert!(is_image_path(Path::new("dir/anim.gif")));
        assert!(!is_image_path(Path::new("clip.mp4")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_from_frame_repeats() {
        let mut source = ImageSource::from_frame(Frame::filled(2, 2, 9));
        for _ in 0..3 {
            let frame = source.read().unwrap().unwrap();
            assert_eq!(frame.width, 2);
            assert_eq!(frame.height, 2);
            assert!(frame.data.iter().all(|&b| b == 9));
        }
        assert_eq!(source.native_fps(), None);
    }

    #[test]
    fn test_open_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let img = image::RgbImage::from_fn(4, 3, |x, _| image::Rgb([x as u8 * 60, 0, 0]));
        img.save(&path).unwrap();

        let mut source = ImageSource::open(&path).unwrap();
        assert_eq!(source.frame_count(), 1);
        let frame = source.read().unwrap().unwrap();
        assert_eq!((frame.width, frame.height), (4, 3));
        assert_eq!(frame.data.len(), 4 * 3 * 3);
        assert_eq!(frame.data[3], 60);
    }

    #[test]
    fn test_animated_gif_cycles_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blink.gif");
        write_two_frame_gif(&path);

        let mut source = ImageSource::open(&path).unwrap();
        assert_eq!(source.frame_count(), 2);
        let first = source.read().unwrap().unwrap();
        let second = source.read().unwrap().unwrap();
        let third = source.read().unwrap().unwrap();
        assert_eq!((first.width, first.height), (4, 4));
        assert!(first.data[0] < 64, "first frame should be dark");
        assert!(second.data[0] > 192, "second frame should be light");
        assert_ne!(first.data, second.data);
        assert_eq!(first.data, third.data);
    }

    #[test]
    fn test_animated_gif_rate_from_delays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blink.gif");
        write_two_frame_gif(&path);

        let source = ImageSource::open(&path).unwrap();
        let fps = source.native_fps().unwrap();
        assert!((fps - 10.0).abs() < 0.5, "got {} fps", fps);
    }

    #[test]
    fn test_rate_from_delays() {
        assert_eq!(rate_from_delays(&[40.0, 40.0]), Some(25.0));
        assert_eq!(rate_from_delays(&[0.0, 0.0]), None);
        assert_eq!(rate_from_delays(&[]), None);
    }

    #[test]
    fn test_open_missing_file_errors() {
        let result = ImageSource::open(Path::new("/definitely/not/here.png"));
        assert!(result.is_err());
    }
}
