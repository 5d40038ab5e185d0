//! Row-major 2-D grid

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::{Array2, s};

/// A `rows x cols` grid of cells, row 0 at the top of the frame.
///
/// Photo channels and vegetation masks are both `Raster<u8>`; a mask cell is
/// 1 when the pixel is classified and 0 otherwise.
///
/// ```ignore
/// use canopy_core::Raster;
///
/// let mut mask: Raster<u8> = Raster::new(480, 640);
/// mask.set(10, 20, 1)?;
/// assert_eq!(mask.count_set(), 1);
/// assert_eq!(mask.first_set_row(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T: RasterElement> {
    cells: Array2<T>,
}

impl<T: RasterElement> Raster<T> {
    /// All-zero grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cells: Array2::zeros((rows, cols)),
        }
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            cells: Array2::from_elem((rows, cols), value),
        }
    }

    /// Wrap row-major `data`, which must hold exactly `rows * cols` cells.
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        let bad_shape = || Error::InvalidDimensions {
            width: cols,
            height: rows,
        };
        if data.len() != rows * cols {
            return Err(bad_shape());
        }
        let cells = Array2::from_shape_vec((rows, cols), data).map_err(|_| bad_shape())?;
        Ok(Self { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// `SizeMismatch` unless this grid is exactly `rows x cols`.
    pub fn require_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() == (rows, cols) {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                er: rows,
                ec: cols,
                ar: self.rows(),
                ac: self.cols(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn check(&self, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = self.shape();
        if row < rows && col < cols {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            })
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.check(row, col)?;
        Ok(self.cells[(row, col)])
    }

    /// Cell at (row, col) with no bounds check.
    ///
    /// # Safety
    /// `row < self.rows()` and `col < self.cols()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.cells.uget((row, col)) }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check(row, col)?;
        self.cells[(row, col)] = value;
        Ok(())
    }

    /// Cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }

    /// Copy out the `rows x cols` window whose top-left cell is (row, col).
    pub fn crop(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Self> {
        let (row_end, col_end) = (row + rows, col + cols);
        if row_end > self.rows() || col_end > self.cols() {
            return Err(Error::IndexOutOfBounds {
                row: row_end,
                col: col_end,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok(Self {
            cells: self.cells.slice(s![row..row_end, col..col_end]).to_owned(),
        })
    }

    /// Number of non-zero cells
    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|v| v.is_set()).count()
    }

    /// Topmost row that holds a non-zero cell
    pub fn first_set_row(&self) -> Option<usize> {
        self.cells
            .rows()
            .into_iter()
            .position(|row| row.iter().any(|v| v.is_set()))
    }
}
