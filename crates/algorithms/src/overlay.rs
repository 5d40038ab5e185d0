//! Colour-tinted overlay images
//!
//! Green-mask pixels are blended toward pure green, yellow-mask pixels toward
//! pure yellow. Everything else, including the border outside the analysis
//! window, keeps its original colour.

use canopy_core::{Error, Result, RgbBands};

use crate::segmentation::VegetationMasks;

pub const GREEN_TINT: [u8; 3] = [0, 255, 0];
pub const YELLOW_TINT: [u8; 3] = [255, 255, 0];

/// Return a tinted copy of `image`. Green wins where both masks are set.
pub fn tint_overlay(image: &RgbBands, masks: &VegetationMasks, alpha: f64) -> Result<RgbBands> {
    masks.check_shape()?;
    let (rows, cols) = masks.shape();
    let (row0, col0) = masks.origin;
    if row0 + rows > image.rows() || col0 + cols > image.cols() {
        return Err(Error::SizeMismatch {
            er: image.rows(),
            ec: image.cols(),
            ar: row0 + rows,
            ac: col0 + cols,
        });
    }

    let mut out = image.clone();
    for row in 0..rows {
        for col in 0..cols {
            let tint = if unsafe { masks.green.get_unchecked(row, col) } != 0 {
                GREEN_TINT
            } else if unsafe { masks.yellow.get_unchecked(row, col) } != 0 {
                YELLOW_TINT
            } else {
                continue;
            };
            let (r, c) = (row0 + row, col0 + col);
            let px = out.pixel(r, c)?;
            out.set_pixel(r, c, blend(px, tint, alpha))?;
        }
    }
    Ok(out)
}

#[inline]
fn blend(px: [u8; 3], tint: [u8; 3], alpha: f64) -> [u8; 3] {
    std::array::from_fn(|c| {
        let v = (1.0 - alpha) * px[c] as f64 + alpha * tint[c] as f64;
        v.round().clamp(0.0, 255.0) as u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropRegion;
    use crate::segmentation::{SegmentationParams, segment};
    use canopy_core::raster::Raster;

    #[test]
    fn test_blend() {
        assert_eq!(blend([100, 100, 100], GREEN_TINT, 0.5), [50, 178, 50]);
        assert_eq!(blend([10, 20, 30], YELLOW_TINT, 0.0), [10, 20, 30]);
        assert_eq!(blend([10, 20, 30], YELLOW_TINT, 1.0), YELLOW_TINT);
    }

    #[test]
    fn test_only_classified_pixels_change() {
        let mut img = RgbBands::filled(10, 10, [40, 40, 200]);
        img.set_pixel(4, 4, [30, 180, 30]).unwrap();
        img.set_pixel(5, 5, [220, 200, 20]).unwrap();
        img.set_pixel(0, 0, [30, 180, 30]).unwrap();

        let masks = segment(&img, &SegmentationParams::default()).unwrap();
        let out = tint_overlay(&img, &masks, 1.0).unwrap();

        assert_eq!(out.pixel(4, 4).unwrap(), GREEN_TINT);
        assert_eq!(out.pixel(5, 5).unwrap(), YELLOW_TINT);
        // Outside the analysis window
        assert_eq!(out.pixel(0, 0).unwrap(), [30, 180, 30]);
        assert_eq!(out.pixel(3, 7).unwrap(), [40, 40, 200]);
    }

    #[test]
    fn test_green_wins_on_overlap() {
        let img = RgbBands::filled(2, 2, [213, 255, 0]);
        let params = SegmentationParams {
            crop: CropRegion::NONE,
            ..Default::default()
        };
        let masks = segment(&img, &params).unwrap();
        let out = tint_overlay(&img, &masks, 1.0).unwrap();
        assert_eq!(out.pixel(1, 1).unwrap(), GREEN_TINT);
    }

    #[test]
    fn test_masks_larger_than_image_rejected() {
        let big = segment(&RgbBands::filled(8, 8, [0, 0, 0]), &Default::default()).unwrap();
        assert!(tint_overlay(&RgbBands::filled(4, 4, [0, 0, 0]), &big, 0.5).is_err());
    }

    #[test]
    fn test_mismatched_masks_rejected() {
        let masks = VegetationMasks {
            green: Raster::filled(4, 4, 1),
            yellow: Raster::new(1, 1),
            origin: (0, 0),
        };
        let result = tint_overlay(&RgbBands::filled(4, 4, [0, 0, 0]), &masks, 0.5);
        assert!(matches!(result, Err(Error::SizeMismatch { .. })));
    }
}
