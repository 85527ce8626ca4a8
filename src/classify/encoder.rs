//! Binary class layers to a single categorical raster
//!
//! `category = 1·C1 + 2·C2 + 3·C3 + 4·C4 + 5·C5`. The weighted sum is only a
//! valid encoding while at most one layer is set per pixel; an overlap is a
//! logic error and is reported instead of being clamped.

use super::masks::ClassMasks;
use super::result::ClassificationResult;
use crate::error::{Error, Result};
use crate::raster::Grid;
use ndarray::Zip;

pub fn encode(masks: &ClassMasks) -> Result<ClassificationResult> {
    let [c1, c2, c3, c4, c5] = masks.rasters();

    // (weighted sum, number of layers set)
    let packed = Zip::from(c1.data())
        .and(c2.data())
        .and(c3.data())
        .and(c4.data())
        .and(c5.data())
        .par_map_collect(|&a, &b, &c, &d, &e| {
            let layers = [a, b, c, d, e];
            let value: u8 = layers
                .iter()
                .zip(1u8..)
                .map(|(&set, weight)| if set == 1.0 { weight } else { 0 })
                .sum();
            let count = layers.iter().filter(|&&set| set == 1.0).count() as u8;
            (value, count)
        });

    if let Some(((row, col), &(value, _))) = packed.indexed_iter().find(|(_, pair)| pair.1 > 1) {
        return Err(Error::ExclusivityViolation { row, col, value });
    }

    let codes = packed.mapv(|(value, _)| value);
    Ok(ClassificationResult::new(codes, c1.transform().copied()))
}
