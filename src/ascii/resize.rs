//! Nearest-neighbour resize to a single-channel luminance image.

use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Rgb};

use crate::source::Frame;

/// Resize an RGB frame to `width x height` with nearest-neighbour sampling
/// and convert it to luminance.
///
/// Luminance uses the `image` crate's sRGB weights
/// (`0.2126 R + 0.7152 G + 0.0722 B`), so pure white stays 255 and pure black
/// stays 0.
///
/// Returns `None` when either size is zero or the frame buffer is shorter
/// than its dimensions promise.
pub fn resize_luma(frame: &Frame, width: u32, height: u32) -> Option<GrayImage> {
    if width == 0 || height == 0 || !frame.is_complete() {
        return None;
    }

    let pixels = &frame.data[..frame.expected_len()];
    let view = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(frame.width, frame.height, pixels)?;
    let resized = imageops::resize(&view, width, height, FilterType::Nearest);
    Some(imageops::grayscale(&resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_picks_pixels() {
        // 4x1: black, white, black, white
        let frame = Frame::new(
            vec![0, 0, 0, 255, 255, 255, 0, 0, 0, 255, 255, 255],
            4,
            1,
        );
        let gray = resize_luma(&frame, 2, 1).unwrap();
        assert_eq!(gray.dimensions(), (2, 1));
        assert!(gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_resize_keeps_extremes() {
        let white = resize_luma(&Frame::filled(64, 64, 255), 16, 16).unwrap();
        assert!(white.pixels().all(|p| p.0[0] == 255));
        let black = resize_luma(&Frame::filled(64, 64, 0), 16, 16).unwrap();
        assert!(black.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_green_brighter_than_red_brighter_than_blue() {
        let frame = Frame::new(vec![255, 0, 0, 0, 255, 0, 0, 0, 255], 3, 1);
        let gray = resize_luma(&frame, 3, 1).unwrap();
        let level = |x| gray.get_pixel(x, 0).0[0];
        let (r, g, b) = (level(0), level(1), level(2));
        assert!(g > r && r > b, "r={} g={} b={}", r, g, b);
    }

    #[test]
    fn test_resize_none_on_zero_target() {
        let frame = Frame::filled(4, 4, 100);
        assert!(resize_luma(&frame, 0, 4).is_none());
        assert!(resize_luma(&frame, 4, 0).is_none());
    }

    #[test]
    fn test_resize_none_on_short_buffer() {
        let frame = Frame::new(vec![0; 10], 4, 4);
        assert!(resize_luma(&frame, 2, 2).is_none());
    }
}
