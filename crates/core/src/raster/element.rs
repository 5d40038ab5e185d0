//! Raster element trait for generic cell values

use num_traits::Zero;
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// Image bands and masks are both `u8`.
pub trait RasterElement: Copy + Debug + PartialEq + Zero + Send + Sync + 'static {
    /// Whether the cell is "set" (non-zero). Used to count mask pixels.
    fn is_set(&self) -> bool {
        !self.is_zero()
    }
}

impl RasterElement for u8 {}
