//! Reduce a resized luminance image to one intensity value per glyph cell.

use image::GrayImage;

use super::dimensions::CellSize;

/// Brightness values, one per output cell, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntensityGrid {
    /// Columns
    pub width: u16,
    /// Rows
    pub height: u16,
    pub values: Vec<u8>,
}

impl IntensityGrid {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn grid_shape(image: &GrayImage, cell: CellSize) -> (u16, u16) {
    let cols = image.width() / cell.width;
    let rows = image.height() / cell.height;
    (
        cols.min(u16::MAX as u32) as u16,
        rows.min(u16::MAX as u32) as u16,
    )
}

#[inline]
fn level(image: &GrayImage, x: u32, y: u32) -> u8 {
    image.get_pixel(x, y).0[0]
}

/// Read the single pixel at the top-left corner of each cell.
pub fn sample_point(image: &GrayImage, cell: CellSize) -> IntensityGrid {
    let (cols, rows) = grid_shape(image, cell);
    let mut values = Vec::with_capacity(cols as usize * rows as usize);
    for i in 0..rows as u32 {
        for j in 0..cols as u32 {
            values.push(level(image, cell.width * j, cell.height * i));
        }
    }
    IntensityGrid {
        width: cols,
        height: rows,
        values,
    }
}

/// Average every pixel of each cell.
pub fn sample_average(image: &GrayImage, cell: CellSize) -> IntensityGrid {
    let (cols, rows) = grid_shape(image, cell);
    let area = cell.width as u64 * cell.height as u64;
    let mut values = Vec::with_capacity(cols as usize * rows as usize);
    for i in 0..rows as u32 {
        for j in 0..cols as u32 {
            let (x0, y0) = (cell.width * j, cell.height * i);
            let mut sum = 0u64;
            for y in y0..y0 + cell.height {
                for x in x0..x0 + cell.width {
                    sum += level(image, x, y) as u64;
                }
            }
            values.push((sum / area) as u8);
        }
    }
    IntensityGrid {
        width: cols,
        height: rows,
        values,
    }
}
