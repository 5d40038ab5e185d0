//! RGB to HSV conversion on the 8-bit scale
//!
//! Hue is stored as degrees / 2 (0..=179) so it fits a byte; saturation and
//! value span 0..=255. These are the units the threshold ranges use.

use crate::maybe_rayon::*;
use canopy_core::raster::Raster;
use canopy_core::{Result, RgbBands};

/// Hue, saturation and value bands of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct HsvBands {
    pub hue: Raster<u8>,
    pub saturation: Raster<u8>,
    pub value: Raster<u8>,
}

impl HsvBands {
    pub fn shape(&self) -> (usize, usize) {
        self.hue.shape()
    }

    /// Fail with `SizeMismatch` unless all three bands share the hue shape.
    pub fn check_shape(&self) -> Result<()> {
        let (rows, cols) = self.shape();
        self.saturation.require_shape(rows, cols)?;
        self.value.require_shape(rows, cols)
    }

    /// `[h, s, v]` at (row, col) without bounds checks.
    ///
    /// # Safety
    /// `row < rows` and `col < cols`.
    #[inline]
    pub unsafe fn pixel_unchecked(&self, row: usize, col: usize) -> [u8; 3] {
        unsafe {
            [
                self.hue.get_unchecked(row, col),
                self.saturation.get_unchecked(row, col),
                self.value.get_unchecked(row, col),
            ]
        }
    }
}

/// Convert one pixel.
///
/// `V = max`, `S = 255 * (max - min) / max`, hue from the dominant channel,
/// each rounded to the nearest integer. Greys (max == min) get hue 0.
#[inline]
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(i32::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta as f64 / max as f64).round() as u8
    };

    let h = if delta == 0 {
        0
    } else {
        let d = delta as f64;
        let mut deg = if max == r {
            60.0 * (g - b) as f64 / d
        } else if max == g {
            120.0 + 60.0 * (b - r) as f64 / d
        } else {
            240.0 + 60.0 * (r - g) as f64 / d
        };
        if deg < 0.0 {
            deg += 360.0;
        }
        // 359.x degrees rounds up to 180, which is the same hue as 0
        ((deg / 2.0).round() as u8) % 180
    };

    [h, s, max as u8]
}

/// Convert a whole image, one row per task.
pub fn to_hsv(image: &RgbBands) -> Result<HsvBands> {
    image.check_shape()?;
    let (rows, cols) = image.shape();

    let pixels: Vec<[u8; 3]> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                let rgb = unsafe {
                    [
                        image.red.get_unchecked(row, col),
                        image.green.get_unchecked(row, col),
                        image.blue.get_unchecked(row, col),
                    ]
                };
                row_data.push(rgb_to_hsv(rgb));
            }
            row_data
        })
        .collect();

    let mut hue = Vec::with_capacity(pixels.len());
    let mut saturation = Vec::with_capacity(pixels.len());
    let mut value = Vec::with_capacity(pixels.len());
    for [h, s, v] in pixels {
        hue.push(h);
        saturation.push(s);
        value.push(v);
    }

    Ok(HsvBands {
        hue: Raster::from_vec(hue, rows, cols)?,
        saturation: Raster::from_vec(saturation, rows, cols)?,
        value: Raster::from_vec(value, rows, cols)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::Error;

    #[test]
    fn test_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    }

    #[test]
    fn test_greys_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
    }

    #[test]
    fn test_mixed_colour() {
        // Olive-ish leaf green: max=g=150, min=b=50, delta=100
        // hue = 120 + 60 * (50 - 100) / 100 = 90 deg -> 45
        // sat = 255 * 100 / 150 = 170
        assert_eq!(rgb_to_hsv([100, 150, 50]), [45, 170, 150]);
    }

    #[test]
    fn test_hue_wraps_below_180() {
        // Red with a hint of blue: hue just under 360 deg
        let [h, _, _] = rgb_to_hsv([255, 0, 1]);
        assert!(h < 180);
    }

    #[test]
    fn test_band_conversion_keeps_layout() {
        let mut img = RgbBands::filled(3, 4, [0, 0, 0]);
        img.set_pixel(2, 3, [0, 255, 0]).unwrap();
        img.set_pixel(0, 1, [255, 255, 0]).unwrap();

        let hsv = to_hsv(&img).unwrap();
        assert_eq!(hsv.shape(), (3, 4));
        assert_eq!(hsv.hue.get(2, 3).unwrap(), 60);
        assert_eq!(hsv.hue.get(0, 1).unwrap(), 30);
        assert_eq!(hsv.value.get(1, 1).unwrap(), 0);
    }

    #[test]
    fn test_mismatched_bands_rejected() {
        let img = RgbBands {
            red: Raster::new(4, 4),
            green: Raster::new(1, 1),
            blue: Raster::new(1, 1),
        };
        assert!(matches!(to_hsv(&img), Err(Error::SizeMismatch { .. })));
    }
}
