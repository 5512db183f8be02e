//! Frame to ASCII rasterization.
//!
//! The pipeline for one frame:
//!
//! 1. **Resize** - nearest-neighbour to a size that fits the terminal grid,
//!    then convert to luminance (both via the `image` crate)
//! 2. **Sample** - one brightness value per glyph cell (point or average)
//! 3. **Map** - brightness to a glyph from the ramp
//!
//! # Ramps
//!
//! Built-in ramps are available via [`CharSet`]; arbitrary ramps via
//! [`GlyphRamp::new`].

mod charset;
mod dimensions;
mod frame;
mod mapping;
mod raster;
mod resize;
mod sample;

pub use charset::{
    CharSet, GlyphRamp, RampError, BLOCKS_RAMP, DENSE_RAMP, DETAILED_RAMP, STANDARD_RAMP,
};
pub use dimensions::{
    grid_dimensions, resized_dimensions, CellSize, CELL_ASPECT, MAX_FILTER_STRENGTH, SCALE_EPSILON,
};
pub use frame::AsciiFrame;
pub use mapping::{glyph_index, map_to_chars};
pub use raster::{Rasterizer, RenderConfig, Sampling};
pub use resize::resize_luma;
pub use sample::{sample_average, sample_point, IntensityGrid};
