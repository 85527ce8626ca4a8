//! Raster grids and band algebra
//!
//! A [`Raster`] holds `f64` samples on a 2-D grid with an optional
//! [`GeoTransform`]. No-data cells are `NaN` everywhere in the crate: loaders
//! convert file sentinels to `NaN` and every operation propagates it.

pub mod algebra;
pub mod geotransform;
pub mod mask;

pub use algebra::CompareOp;
pub use geotransform::GeoTransform;
pub use mask::Mask;

use crate::error::{Error, Result};
use ndarray::Array2;

/// Anything laid out on a raster grid.
pub trait Grid {
    fn shape(&self) -> (usize, usize);
    fn transform(&self) -> Option<&GeoTransform>;
}

/// Fails unless both grids have the same dimensions and, when both carry one,
/// the same geotransform.
pub fn ensure_aligned(expected: &impl Grid, actual: &impl Grid) -> Result<()> {
    let (er, ec) = expected.shape();
    let (ar, ac) = actual.shape();
    if (er, ec) != (ar, ac) {
        return Err(Error::Misaligned { er, ec, ar, ac });
    }

    if let (Some(a), Some(b)) = (expected.transform(), actual.transform())
        && !a.approx_eq(b)
    {
        return Err(Error::GeoTransformMismatch);
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: Array2<f64>,
    transform: Option<GeoTransform>,
}

impl Raster {
    /// Raster of the given size with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Raster of the given size with every cell no-data
    pub fn nodata(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, f64::NAN)
    }

    /// Row-major samples
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 || data.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| Error::InvalidDimensions { rows, cols })?;

        Ok(Self::from_array(array))
    }

    pub fn from_array(data: Array2<f64>) -> Self {
        Self {
            data,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// New raster on this raster's grid
    pub(crate) fn with_data(&self, data: Array2<f64>) -> Self {
        debug_assert_eq!(data.dim(), self.data.dim());
        Self {
            data,
            transform: self.transform,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at (row, col); `None` outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Whether (row, col) is inside the grid and holds no-data
    pub fn is_nodata_at(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some_and(f64::is_nan)
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// (min, max) of the valid samples, `None` if there are none
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl Grid for Raster {
    fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn transform(&self) -> Option<&GeoTransform> {
        self.transform.as_ref()
    }
}
