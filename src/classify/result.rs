use super::rules::WaterClass;
use crate::raster::{GeoTransform, Grid, Raster};
use ndarray::Array2;
use std::collections::BTreeMap;

/// Terminal product of a run: one class code (0–5) per pixel.
///
/// Code 0 is the masked value: no class applies, whether because of no-data
/// or because the pixel fell between the decision thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    codes: Array2<u8>,
    transform: Option<GeoTransform>,
}

impl ClassificationResult {
    pub(crate) fn new(codes: Array2<u8>, transform: Option<GeoTransform>) -> Self {
        Self { codes, transform }
    }

    pub fn codes(&self) -> &Array2<u8> {
        &self.codes
    }

    /// Class at (row, col); `None` outside the grid
    pub fn class_at(&self, row: usize, col: usize) -> Option<WaterClass> {
        self.codes
            .get((row, col))
            .and_then(|&code| WaterClass::from_code(code))
    }

    /// Pixel count per class, unclassified included
    pub fn class_counts(&self) -> BTreeMap<WaterClass, usize> {
        let mut counts = BTreeMap::new();
        for &code in &self.codes {
            if let Some(class) = WaterClass::from_code(code) {
                *counts.entry(class).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn classified_count(&self) -> usize {
        self.codes.iter().filter(|&&c| c != 0).count()
    }

    /// Class codes as a raster with unclassified pixels masked to no-data.
    pub fn to_raster(&self) -> Raster {
        let data = self
            .codes
            .mapv(|c| if c == 0 { f64::NAN } else { f64::from(c) });
        let raster = Raster::from_array(data);
        match self.transform {
            Some(gt) => raster.with_transform(gt),
            None => raster,
        }
    }
}

impl Grid for ClassificationResult {
    fn shape(&self) -> (usize, usize) {
        self.codes.dim()
    }

    fn transform(&self) -> Option<&GeoTransform> {
        self.transform.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_counts_and_masked_raster() {
        let result = ClassificationResult::new(array![[0, 5, 5], [1, 3, 0]], None);

        let counts = result.class_counts();
        assert_eq!(counts[&WaterClass::Unclassified], 2);
        assert_eq!(counts[&WaterClass::HabRich], 2);
        assert_eq!(counts[&WaterClass::SedimentRich], 1);
        assert!(!counts.contains_key(&WaterClass::HabPoor));
        assert_eq!(result.classified_count(), 4);

        let raster = result.to_raster();
        assert!(raster.is_nodata_at(0, 0));
        assert_eq!(raster.get(0, 1), Some(5.0));
        assert_eq!(raster.valid_count(), 4);

        assert_eq!(result.class_at(1, 1), Some(WaterClass::CdomRich));
        assert_eq!(result.class_at(4, 4), None);
    }
}
