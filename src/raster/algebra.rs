//! Elementwise band algebra
//!
//! Every operation returns a new raster and leaves its inputs untouched. A
//! no-data input cell always produces a no-data output cell, and numeric
//! domain failures (division by zero, log of a non-positive value) produce
//! no-data instead of an error so one bad pixel never aborts a scene.

use super::{Grid, Mask, Raster, ensure_aligned};
use crate::error::Result;
use ndarray::Zip;

/// Comparison used to derive a [`Mask`] from a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    Eq,
}

impl CompareOp {
    /// `false` whenever either side is `NaN`
    pub fn apply(self, a: f64, b: f64) -> bool {
        match self {
            CompareOp::Gt => a > b,
            CompareOp::Lt => a < b,
            CompareOp::Eq => a == b,
        }
    }
}

impl Raster {
    /// Applies `f` to every valid cell; no-data cells stay no-data.
    pub fn map<F>(&self, f: F) -> Raster
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        let data = Zip::from(self.data()).par_map_collect(|&v| if v.is_nan() { v } else { f(v) });
        self.with_data(data)
    }

    /// Applies `f` cell by cell to two aligned rasters.
    pub fn zip_map<F>(&self, other: &Raster, f: F) -> Result<Raster>
    where
        F: Fn(f64, f64) -> f64 + Sync + Send,
    {
        ensure_aligned(self, other)?;

        let data = Zip::from(self.data())
            .and(other.data())
            .par_map_collect(|&a, &b| {
                if a.is_nan() || b.is_nan() {
                    f64::NAN
                } else {
                    f(a, b)
                }
            });

        Ok(self.with_data(data))
    }

    pub fn add(&self, other: &Raster) -> Result<Raster> {
        self.zip_map(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Raster) -> Result<Raster> {
        self.zip_map(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Raster) -> Result<Raster> {
        self.zip_map(other, |a, b| a * b)
    }

    /// Division by zero yields no-data.
    pub fn div(&self, other: &Raster) -> Result<Raster> {
        self.zip_map(other, safe_div)
    }

    pub fn add_scalar(&self, value: f64) -> Raster {
        self.map(|v| v + value)
    }

    pub fn mul_scalar(&self, value: f64) -> Raster {
        self.map(|v| v * value)
    }

    /// Base-10 logarithm; non-positive cells yield no-data.
    pub fn log10(&self) -> Raster {
        self.map(safe_log10)
    }

    /// Raises every cell to `exponent`. Fractional powers of negative values
    /// yield no-data.
    pub fn powf(&self, exponent: f64) -> Raster {
        self.map(|v| v.powf(exponent))
    }

    /// Compares every cell with a scalar threshold. No-data cells and a
    /// no-data threshold are never selected.
    pub fn compare(&self, op: CompareOp, threshold: f64) -> Mask {
        let data = Zip::from(self.data()).par_map_collect(|&v| op.apply(v, threshold));
        Mask::from_parts(data, self.transform().copied())
    }

    /// Compares two aligned rasters cell by cell.
    pub fn compare_raster(&self, op: CompareOp, other: &Raster) -> Result<Mask> {
        ensure_aligned(self, other)?;

        let data = Zip::from(self.data())
            .and(other.data())
            .par_map_collect(|&a, &b| op.apply(a, b));

        Ok(Mask::from_parts(data, self.transform().copied()))
    }

    pub fn gt(&self, threshold: f64) -> Mask {
        self.compare(CompareOp::Gt, threshold)
    }

    pub fn lt(&self, threshold: f64) -> Mask {
        self.compare(CompareOp::Lt, threshold)
    }

    pub fn eq_value(&self, value: f64) -> Mask {
        self.compare(CompareOp::Eq, value)
    }

    /// Cells holding data
    pub fn valid(&self) -> Mask {
        let data = Zip::from(self.data()).par_map_collect(|v| !v.is_nan());
        Mask::from_parts(data, self.transform().copied())
    }

    /// Keeps cells where `mask` is set and turns every other cell into no-data.
    pub fn mask(&self, mask: &Mask) -> Result<Raster> {
        ensure_aligned(self, mask)?;

        let data = Zip::from(self.data())
            .and(mask.data())
            .par_map_collect(|&v, &keep| if keep { v } else { f64::NAN });

        Ok(self.with_data(data))
    }
}

pub(crate) fn safe_div(a: f64, b: f64) -> f64 {
    if b == 0.0 { f64::NAN } else { a / b }
}

pub(crate) fn safe_log10(v: f64) -> f64 {
    if v > 0.0 { v.log10() } else { f64::NAN }
}
