//! Video file decoding through an ffmpeg child process.
//!
//! ffmpeg decodes the input and writes raw RGB24 frames to stdout, one
//! `width * height * 3` byte chunk per frame. The frame size is either the
//! resolution hint passed to `configure()` or the native stream size
//! reported by ffprobe. ffprobe also supplies the stream's frame rate so the
//! producer can pace playback to it.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use super::types::{Frame, Resolution, SourceError, SourceKind};
use super::FrameSource;

/// Map a spawn failure to `FfmpegNotFound` when the binary is missing.
fn spawn_error(program: &'static str, e: io::Error) -> SourceError {
    if e.kind() == io::ErrorKind::NotFound {
        SourceError::FfmpegNotFound
    } else {
        SourceError::SpawnFailed { program, source: e }
    }
}

/// What ffprobe reports about the first video stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub resolution: Resolution,
    /// `r_frame_rate`, when the container declares one
    pub fps: Option<f64>,
}

/// Parse an ffprobe rate such as `30000/1001` or `25`.
///
/// `0/0` (no declared rate) and other non-positive values yield `None`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    let fps = match rate.split_once('/') {
        Some((num, den)) => num.trim().parse::<f64>().ok()? / den.trim().parse::<f64>().ok()?,
        None => rate.parse::<f64>().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Parse ffprobe's `key=value` lines for `width`, `height` and
/// `r_frame_rate`.
pub fn parse_probe_output(output: &str) -> Option<StreamInfo> {
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut fps = None;
    for line in output.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        match key.trim() {
            "width" => width = value.trim().parse().ok(),
            "height" => height = value.trim().parse().ok(),
            "r_frame_rate" => fps = parse_frame_rate(value),
            _ => {}
        }
    }
    let (width, height) = (width?, height?);
    if width == 0 || height == 0 {
        return None;
    }
    Some(StreamInfo {
        resolution: Resolution { width, height },
        fps,
    })
}

/// Ask ffprobe for the size and frame rate of the first video stream.
pub fn probe_stream(input: &str) -> Result<StreamInfo, SourceError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1",
            input,
        ])
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error("ffprobe", e))?;

    if !output.status.success() {
        return Err(SourceError::ProbeFailed {
            input: input.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        SourceError::ProbeFailed {
            input: input.to_string(),
            reason: "no video stream found".to_string(),
        }
    })
}

/// Build the ffmpeg argument list that decodes `input` to raw RGB24 on stdout.
pub fn decoder_args(input: &str, scale: Option<Resolution>) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostdin", "-i", input]
        .iter()
        .map(|s| s.to_string())
        .collect();
    if let Some(res) = scale {
        args.push("-vf".to_string());
        args.push(format!("scale={}:{}", res.width, res.height));
    }
    args.extend(
        ["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"]
            .iter()
            .map(|s| s.to_string()),
    );
    args
}

/// A running ffmpeg decoder process.
struct Decoder {
    child: Child,
    stdout: ChildStdout,
    stderr_thread: Option<JoinHandle<()>>,
}

impl Decoder {
    fn spawn(args: &[String]) -> Result<Self, SourceError> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error("ffmpeg", e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            SourceError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "ffmpeg stdout unavailable"))
        })?;

        // stdout/stderr belong to the TUI, so decoder diagnostics go to the log.
        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                for line in BufReader::new(stderr).lines() {
                    match line {
                        Ok(l) => log::warn!("[ffmpeg] {}", l),
                        Err(_) => break,
                    }
                }
            })
        });

        Ok(Self {
            child,
            stdout,
            stderr_thread,
        })
    }

    fn shutdown(&mut self) {
        if matches!(self.child.try_wait(), Ok(None)) {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        if let Some(handle) = self.stderr_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Frame source backed by an ffmpeg decode of a file.
pub struct FfmpegSource {
    input: String,
    hint: Option<Resolution>,
    decoder: Option<Decoder>,
    resolution: Option<Resolution>,
    fps: Option<f64>,
    finished: bool,
}

impl FfmpegSource {
    /// Create a source for `input`. The decoder starts on the first `read()`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            hint: None,
            decoder: None,
            resolution: None,
            fps: None,
            finished: false,
        }
    }

    /// Frame size of the running decoder, once started.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }
}

/// Fill `buf` completely, returning `Ok(false)` on a clean EOF before any byte.
fn read_frame_bytes(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "truncated frame at end of stream",
                ))
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

impl FrameSource for FfmpegSource {
    fn configure(&mut self, resolution: Resolution) {
        // Only honoured before decoding starts.
        if self.decoder.is_none() {
            self.hint = Some(resolution);
        }
    }

    fn start(&mut self) -> Result<(), SourceError> {
        if self.decoder.is_some() {
            return Ok(());
        }
        let (resolution, scale, fps) = match self.hint {
            // Scaling makes the size known; the rate is still worth asking for
            Some(hint) => {
                let fps = match probe_stream(&self.input) {
                    Ok(info) => info.fps,
                    Err(e) => {
                        log::debug!("No frame rate for '{}': {}", self.input, e);
                        None
                    }
                };
                (hint, Some(hint), fps)
            }
            None => {
                let info = probe_stream(&self.input)?;
                (info.resolution, None, info.fps)
            }
        };
        let args = decoder_args(&self.input, scale);
        match fps {
            Some(fps) => log::info!("Decoding '{}' at {}, {:.2} fps", self.input, resolution, fps),
            None => log::info!("Decoding '{}' at {}", self.input, resolution),
        }
        self.decoder = Some(Decoder::spawn(&args)?);
        self.resolution = Some(resolution);
        self.fps = fps;
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Frame>, SourceError> {
        if self.finished {
            return Ok(None);
        }
        if self.decoder.is_none() {
            self.start()?;
        }
        let (Some(decoder), Some(res)) = (self.decoder.as_mut(), self.resolution) else {
            return Ok(None);
        };

        let mut data = vec![0u8; res.width as usize * res.height as usize * Frame::BYTES_PER_PIXEL];
        match read_frame_bytes(&mut decoder.stdout, &mut data) {
            Ok(true) => Ok(Some(Frame::new(data, res.width, res.height))),
            Ok(false) => {
                self.finished = true;
                decoder.shutdown();
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                decoder.shutdown();
                Err(e.into())
            }
        }
    }

    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn native_fps(&self) -> Option<f64> {
        self.fps
    }

    fn describe(&self) -> String {
        format!("file '{}'", self.input)
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let info = parse_probe_output("width=1920\nheight=1080\nr_frame_rate=30000/1001\n").unwrap();
        assert_eq!(
            info.resolution,
            Resolution {
                width: 1920,
                height: 1080
            }
        );
        let fps = info.fps.unwrap();
        assert!((fps - 29.97).abs() < 0.01, "got {}", fps);
    }

    #[test]
    fn test_parse_probe_output_any_order() {
        let info = parse_probe_output("r_frame_rate=25/1\n\n  height=480\nwidth=640  \n").unwrap();
        assert_eq!(info.resolution, Resolution::MEDIUM);
        assert_eq!(info.fps, Some(25.0));
    }

    #[test]
    fn test_parse_probe_output_without_rate() {
        let info = parse_probe_output("width=640\nheight=480\nr_frame_rate=0/0").unwrap();
        assert_eq!(info.resolution, Resolution::MEDIUM);
        assert_eq!(info.fps, None);
    }

    #[test]
    fn test_parse_probe_output_rejects_garbage() {
        assert_eq!(parse_probe_output(""), None);
        assert_eq!(parse_probe_output("width=N/A\nheight=N/A"), None);
        assert_eq!(parse_probe_output("width=0\nheight=480"), None);
        assert_eq!(parse_probe_output("width=640"), None);
    }

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate(" 24 "), Some(24.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("-5/1"), None);
        assert_eq!(parse_frame_rate("abc"), None);
    }

    #[test]
    fn test_decoder_args_without_scale() {
        let args = decoder_args("clip.mp4", None);
        assert!(args.windows(2).any(|w| w[0] == "-i" && w[1] == "clip.mp4"));
        assert!(!args.iter().any(|a| a == "-vf"));
        assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgb24"));
        assert_eq!(args.last().map(String::as_str), Some("-"));
    }

    #[test]
    fn test_decoder_args_with_scale() {
        let args = decoder_args("clip.mp4", Some(Resolution::PREVIEW));
        assert!(args.windows(2).any(|w| w[0] == "-vf" && w[1] == "scale=960:720"));
    }

    #[test]
    fn test_read_frame_bytes_full_and_eof() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut reader = &data[..];
        let mut buf = [0u8; 3];
        assert!(read_frame_bytes(&mut reader, &mut buf).unwrap());
        assert_eq!(buf, [1, 2, 3]);
        assert!(read_frame_bytes(&mut reader, &mut buf).unwrap());
        assert_eq!(buf, [4, 5, 6]);
        assert!(!read_frame_bytes(&mut reader, &mut buf).unwrap());
    }

    #[test]
    fn test_read_frame_bytes_truncated() {
        let data = [1u8, 2];
        let mut reader = &data[..];
        let mut buf = [0u8; 3];
        let err = read_frame_bytes(&mut reader, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_configure_sets_hint_before_start() {
        let mut source = FfmpegSource::new("clip.mp4");
        source.configure(Resolution::LOW);
        assert_eq!(source.hint, Some(Resolution::LOW));
        assert_eq!(source.kind(), SourceKind::File);
        assert!(source.resolution().is_none());
        assert_eq!(source.native_fps(), None);
    }
}
