//! Three-band 8-bit colour images
//!
//! A decoded photo is held as one `Raster<u8>` per channel, so per-pixel
//! algorithms work band-wise the same way they would on any other raster.

use crate::error::{Error, Result};
use crate::raster::Raster;
use image::RgbImage;

/// An 8-bit RGB image split into red, green and blue bands of equal shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbBands {
    pub red: Raster<u8>,
    pub green: Raster<u8>,
    pub blue: Raster<u8>,
}

impl RgbBands {
    /// Assemble bands, checking that all three share one shape.
    pub fn new(red: Raster<u8>, green: Raster<u8>, blue: Raster<u8>) -> Result<Self> {
        let bands = Self { red, green, blue };
        bands.check_shape()?;
        Ok(bands)
    }

    /// Fail with `SizeMismatch` unless green and blue match the red band.
    pub fn check_shape(&self) -> Result<()> {
        let (rows, cols) = self.shape();
        self.green.require_shape(rows, cols)?;
        self.blue.require_shape(rows, cols)
    }

    /// A uniformly coloured image.
    pub fn filled(rows: usize, cols: usize, rgb: [u8; 3]) -> Self {
        Self {
            red: Raster::filled(rows, cols, rgb[0]),
            green: Raster::filled(rows, cols, rgb[1]),
            blue: Raster::filled(rows, cols, rgb[2]),
        }
    }

    /// Split an interleaved `image` buffer into bands.
    pub fn from_rgb_image(img: &RgbImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        let (rows, cols) = (height as usize, width as usize);
        let mut red = Vec::with_capacity(rows * cols);
        let mut green = Vec::with_capacity(rows * cols);
        let mut blue = Vec::with_capacity(rows * cols);
        for px in img.pixels() {
            red.push(px[0]);
            green.push(px[1]);
            blue.push(px[2]);
        }
        Ok(Self {
            red: Raster::from_vec(red, rows, cols)?,
            green: Raster::from_vec(green, rows, cols)?,
            blue: Raster::from_vec(blue, rows, cols)?,
        })
    }

    /// Interleave the bands back into an `image` buffer.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        let (rows, cols) = self.shape();
        let mut buf = Vec::with_capacity(rows * cols * 3);
        for ((r, g), b) in self.red.iter().zip(self.green.iter()).zip(self.blue.iter()) {
            buf.extend_from_slice(&[*r, *g, *b]);
        }
        RgbImage::from_raw(cols as u32, rows as u32, buf).ok_or(Error::InvalidDimensions {
            width: cols,
            height: rows,
        })
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.red.shape()
    }

    pub fn rows(&self) -> usize {
        self.red.rows()
    }

    pub fn cols(&self) -> usize {
        self.red.cols()
    }

    /// Pixel at (row, col) as `[r, g, b]`
    pub fn pixel(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        Ok([
            self.red.get(row, col)?,
            self.green.get(row, col)?,
            self.blue.get(row, col)?,
        ])
    }

    /// Overwrite the pixel at (row, col)
    pub fn set_pixel(&mut self, row: usize, col: usize, rgb: [u8; 3]) -> Result<()> {
        self.red.set(row, col, rgb[0])?;
        self.green.set(row, col, rgb[1])?;
        self.blue.set(row, col, rgb[2])
    }

    /// Copy out a window of all three bands.
    pub fn crop(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            red: self.red.crop(row, col, rows, cols)?,
            green: self.green.crop(row, col, rows, cols)?,
            blue: self.blue.crop(row, col, rows, cols)?,
        })
    }
}
