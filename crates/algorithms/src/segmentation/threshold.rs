//! Inclusive range thresholding of HSV bands

use crate::config::HsvRange;
use crate::maybe_rayon::*;
use canopy_core::raster::Raster;
use canopy_core::Result;

use super::hsv::HsvBands;

/// Binary mask (1 inside `range`, 0 outside) over every pixel of `hsv`.
pub fn in_range(hsv: &HsvBands, range: &HsvRange) -> Result<Raster<u8>> {
    hsv.check_shape()?;
    let (rows, cols) = hsv.shape();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u8; cols];
            for (col, cell) in row_data.iter_mut().enumerate() {
                let px = unsafe { hsv.pixel_unchecked(row, col) };
                *cell = u8::from(range.contains(px));
            }
            row_data
        })
        .collect();

    Raster::from_vec(data, rows, cols)
}
