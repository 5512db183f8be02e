//! Frame to glyph-grid rasterization.

use std::num::NonZeroU32;

use super::charset::GlyphRamp;
use super::dimensions::{grid_dimensions, resized_dimensions, CellSize};
use super::frame::AsciiFrame;
use super::mapping::map_to_chars;
use super::resize::resize_luma;
use super::sample::{sample_average, sample_point, IntensityGrid};
use crate::source::Frame;

/// How each glyph cell is reduced to one brightness value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sampling {
    /// Single pixel at the cell origin
    #[default]
    Point,
    /// Mean of every pixel in the cell
    Average,
}

/// Per-draw rasterization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Terminal columns
    pub target_width: u16,
    /// Terminal rows
    pub target_height: u16,
    pub filter_strength: NonZeroU32,
    pub sampling: Sampling,
    pub invert: bool,
}

impl RenderConfig {
    /// Settings for a `target_width` x `target_height` character grid with
    /// stride 1, point sampling and no inversion.
    ///
    /// # Arguments
    /// * `target_width` - Terminal columns
    /// * `target_height` - Terminal rows
    pub fn new(target_width: u16, target_height: u16) -> Self {
        Self {
            target_width,
            target_height,
            filter_strength: NonZeroU32::MIN,
            sampling: Sampling::default(),
            invert: false,
        }
    }

    /// Same settings at another terminal size.
    pub fn with_target(self, target_width: u16, target_height: u16) -> Self {
        Self {
            target_width,
            target_height,
            ..self
        }
    }

    pub fn cell(&self) -> CellSize {
        CellSize::from_filter_strength(self.filter_strength)
    }

    /// Glyph grid `(cols, rows)` a frame of this size produces.
    pub fn grid_for(&self, frame_width: u32, frame_height: u32) -> (u16, u16) {
        grid_dimensions(
            frame_width,
            frame_height,
            self.target_width,
            self.target_height,
            self.cell(),
        )
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Converts frames to glyph blocks with a fixed ramp.
///
/// Pure: the same frame and config always yield the same block.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    ramp: GlyphRamp,
}

impl Rasterizer {
    /// Create a rasterizer that maps brightness onto `ramp`, sparsest glyph
    /// for black.
    pub fn new(ramp: GlyphRamp) -> Self {
        Self { ramp }
    }

    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Downsample a frame to one brightness value per glyph cell.
    pub fn intensity_grid(&self, frame: &Frame, config: &RenderConfig) -> IntensityGrid {
        let cell = config.cell();
        let (width, height) = resized_dimensions(
            frame.width,
            frame.height,
            config.target_width,
            config.target_height,
            cell,
        );
        let Some(resized) = resize_luma(frame, width, height) else {
            return IntensityGrid::default();
        };
        match config.sampling {
            Sampling::Point => sample_point(&resized, cell),
            Sampling::Average => sample_average(&resized, cell),
        }
    }

    /// Rasterize a frame at the configured terminal size.
    ///
    /// Degenerate input (zero sizes, short buffer) yields an empty block.
    pub fn rasterize(&self, frame: &Frame, config: &RenderConfig) -> AsciiFrame {
        let grid = self.intensity_grid(frame, config);
        if grid.is_empty() {
            return AsciiFrame::default();
        }
        let chars = map_to_chars(&grid, &self.ramp, config.invert);
        AsciiFrame {
            chars,
            width: grid.width,
            height: grid.height,
        }
    }
}
