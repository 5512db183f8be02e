//! Brightness to glyph mapping.

use super::charset::GlyphRamp;
use super::sample::IntensityGrid;

/// Ramp index for a brightness value.
///
/// Splits 0..=255 into `len` equal bands; always below `len`.
#[inline]
pub fn glyph_index(value: u8, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (value as usize * len / 256).min(len - 1)
}

/// Map an intensity grid to glyphs, row-major.
///
/// With `invert` the brightness is reversed first, for light terminal
/// backgrounds.
pub fn map_to_chars(grid: &IntensityGrid, ramp: &GlyphRamp, invert: bool) -> Vec<char> {
    grid.values
        .iter()
        .map(|&v| {
            let v = if invert { 255 - v } else { v };
            ramp.glyph(glyph_index(v, ramp.len()))
        })
        .collect()
}
