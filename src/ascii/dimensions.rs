//! Geometry of the frame-to-glyph-grid mapping.
//!
//! Terminal cells are roughly twice as tall as they are wide, so each glyph
//! covers `filter_strength` resized pixels horizontally and twice that
//! vertically.

use std::num::NonZeroU32;

/// Terminal cell height relative to its width.
pub const CELL_ASPECT: u32 = 2;

/// Largest accepted sampling stride. Beyond this even a 4K frame yields an
/// empty grid on a small terminal.
pub const MAX_FILTER_STRENGTH: u32 = 64;

/// Added to each scale factor so the resized image always lands strictly
/// inside the character grid.
pub const SCALE_EPSILON: f64 = 1e-3;

/// Resized pixels covered by one glyph cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    /// Cell size for a sampling stride.
    pub fn from_filter_strength(filter_strength: NonZeroU32) -> Self {
        let width = filter_strength.get();
        Self {
            width,
            height: width.saturating_mul(CELL_ASPECT),
        }
    }
}

/// Size of the intermediate resized image.
///
/// `scale = frame / (target * cell) + epsilon` on each axis, and the frame is
/// resized to `round(frame / scale)`. The epsilon keeps the quotient below
/// `target * cell`, so rounding never yields more pixels than the grid can
/// hold. Zero on any input yields `(0, 0)`.
pub fn resized_dimensions(
    frame_width: u32,
    frame_height: u32,
    target_width: u16,
    target_height: u16,
    cell: CellSize,
) -> (u32, u32) {
    if frame_width == 0 || frame_height == 0 || target_width == 0 || target_height == 0 {
        return (0, 0);
    }

    let x_scale = frame_width as f64 / (target_width as f64 * cell.width as f64) + SCALE_EPSILON;
    let y_scale =
        frame_height as f64 / (target_height as f64 * cell.height as f64) + SCALE_EPSILON;

    (
        (frame_width as f64 / x_scale).round() as u32,
        (frame_height as f64 / y_scale).round() as u32,
    )
}

/// Glyph grid `(cols, rows)` a frame rasterizes to.
///
/// Never exceeds `(target_width, target_height)`.
pub fn grid_dimensions(
    frame_width: u32,
    frame_height: u32,
    target_width: u16,
    target_height: u16,
    cell: CellSize,
) -> (u16, u16) {
    let (resized_width, resized_height) =
        resized_dimensions(frame_width, frame_height, target_width, target_height, cell);
    let cols = (resized_width / cell.width).min(target_width as u32);
    let rows = (resized_height / cell.height).min(target_height as u32);
    (cols as u16, rows as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(fs: u32) -> CellSize {
        CellSize::from_filter_strength(NonZeroU32::new(fs).unwrap())
    }

    #[test]
    fn test_cell_size_doubles_height() {
        assert_eq!(cell(1), CellSize { width: 1, height: 2 });
        assert_eq!(cell(3), CellSize { width: 3, height: 6 });
    }

    #[test]
    fn test_exact_fit() {
        // 64/(16*1) = 4 -> 4.001 -> 15.996 -> 16
        assert_eq!(resized_dimensions(64, 64, 16, 8, cell(1)), (16, 16));
        assert_eq!(grid_dimensions(64, 64, 16, 8, cell(1)), (16, 8));
    }

    #[test]
    fn test_fills_standard_terminal() {
        assert_eq!(grid_dimensions(960, 720, 80, 24, cell(1)), (80, 24));
        assert_eq!(grid_dimensions(1920, 1080, 200, 50, cell(1)), (200, 50));
    }

    #[test]
    fn test_filter_strength_keeps_grid_size() {
        assert_eq!(resized_dimensions(960, 720, 80, 24, cell(2)), (160, 96));
        assert_eq!(grid_dimensions(960, 720, 80, 24, cell(2)), (80, 24));
    }

    #[test]
    fn test_zero_inputs() {
        assert_eq!(grid_dimensions(0, 720, 80, 24, cell(1)), (0, 0));
        assert_eq!(grid_dimensions(960, 0, 80, 24, cell(1)), (0, 0));
        assert_eq!(grid_dimensions(960, 720, 0, 24, cell(1)), (0, 0));
        assert_eq!(grid_dimensions(960, 720, 80, 0, cell(1)), (0, 0));
    }

    #[test]
    fn test_never_exceeds_target() {
        for &(fw, fh) in &[(1u32, 1u32), (7, 3), (64, 64), (640, 480), (1280, 720), (3, 1000)] {
            for &(tw, th) in &[(1u16, 1u16), (13, 7), (80, 24), (300, 90)] {
                for fs in 1..=4 {
                    let (cols, rows) = grid_dimensions(fw, fh, tw, th, cell(fs));
                    assert!(cols <= tw && rows <= th, "{}x{} -> {}x{}", fw, fh, cols, rows);
                }
            }
        }
    }
}
