use super::{GeoTransform, Grid, Raster, ensure_aligned};
use crate::error::Result;
use ndarray::{Array2, Zip};

/// Boolean selection over a raster grid; `true` marks a selected cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    data: Array2<bool>,
    transform: Option<GeoTransform>,
}

impl Mask {
    pub fn from_array(data: Array2<bool>) -> Self {
        Self {
            data,
            transform: None,
        }
    }

    pub(crate) fn from_parts(data: Array2<bool>, transform: Option<GeoTransform>) -> Self {
        Self { data, transform }
    }

    pub fn data(&self) -> &Array2<bool> {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        self.data.get((row, col)).copied()
    }

    /// Number of selected cells
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.combine(other, |a, b| a && b)
    }

    pub fn or(&self, other: &Mask) -> Result<Mask> {
        self.combine(other, |a, b| a || b)
    }

    pub fn not(&self) -> Mask {
        let data = self.data.mapv(|v| !v);
        Self::from_parts(data, self.transform)
    }

    /// `{0, 1}` raster: selected cells are 1, everything else 0.
    pub fn to_binary(&self) -> Raster {
        let data = self.data.mapv(|v| if v { 1.0 } else { 0.0 });
        let raster = Raster::from_array(data);
        match self.transform {
            Some(gt) => raster.with_transform(gt),
            None => raster,
        }
    }

    fn combine<F>(&self, other: &Mask, f: F) -> Result<Mask>
    where
        F: Fn(bool, bool) -> bool + Sync + Send,
    {
        ensure_aligned(self, other)?;
        let data = Zip::from(&self.data)
            .and(&other.data)
            .par_map_collect(|&a, &b| f(a, b));
        Ok(Self::from_parts(data, self.transform))
    }
}

impl Grid for Mask {
    fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn transform(&self) -> Option<&GeoTransform> {
        self.transform.as_ref()
    }
}
