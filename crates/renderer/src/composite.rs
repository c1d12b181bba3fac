//! Grid-to-bitmap compositing.

use radar_common::{Bitmap, ScalarGrid};
use rayon::prelude::*;

use crate::ramp::ColorRamp;

/// Pixels per parallel work unit
const CHUNK_SIZE: usize = 16 * 1024;

/// Colorize every sample of `grid` into a bitmap of the same shape.
///
/// Pixel `i` is `ramp.colorize(samples[i])`. Large grids are split into
/// contiguous chunks and processed on the rayon pool.
pub fn composite(grid: &ScalarGrid, ramp: &ColorRamp) -> Bitmap {
    Bitmap::from_grid(grid, |samples, pixels| {
        if samples.len() < CHUNK_SIZE {
            for (pixel, &value) in pixels.iter_mut().zip(samples) {
                *pixel = ramp.colorize(value);
            }
            return;
        }

        pixels
            .par_chunks_mut(CHUNK_SIZE)
            .zip(samples.par_chunks(CHUNK_SIZE))
            .for_each(|(out, src)| {
                for (pixel, &value) in out.iter_mut().zip(src) {
                    *pixel = ramp.colorize(value);
                }
            });
    })
}
