//! Frame transformation utilities.

use super::types::Frame;

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let bpp = Frame::BYTES_PER_PIXEL;
    let row_len = width * bpp;
    if row_len == 0 {
        return;
    }

    for row in frame.data.chunks_exact_mut(row_len) {
        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}
