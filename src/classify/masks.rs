use super::rules::{DecisionRules, PixelInputs, WaterClass};
use crate::error::{Error, Result};
use crate::products::DerivedProducts;
use crate::raster::{Grid, Mask, Raster, ensure_aligned};
use ndarray::Zip;

/// One clean `{0, 1}` raster per class, in [`WaterClass::CLASSES`] order.
#[derive(Debug, Clone)]
pub struct ClassMasks {
    masks: [Raster; 5],
}

impl ClassMasks {
    /// Evaluates every class predicate independently at every pixel.
    ///
    /// No-data in any input yields 0 ("not this class") in every mask.
    pub fn compute(products: &DerivedProducts, rules: &DecisionRules) -> Result<Self> {
        ensure_aligned(&products.red, &products.green)?;
        ensure_aligned(&products.red, &products.flh)?;
        ensure_aligned(&products.red, &products.bbp_ratio)?;

        let masks = WaterClass::CLASSES.map(|class| {
            let data = Zip::from(products.red.data())
                .and(products.green.data())
                .and(products.flh.data())
                .and(products.bbp_ratio.data())
                .par_map_collect(|&red, &green, &flh, &bbp_ratio| {
                    let px = PixelInputs {
                        red,
                        green,
                        flh,
                        bbp_ratio,
                    };
                    if rules.matches(class, &px) { 1.0 } else { 0.0 }
                });
            products.red.with_data(data)
        });

        Ok(Self { masks })
    }

    /// Wraps externally produced masks after checking they share a grid and
    /// hold only 0 and 1.
    pub fn from_rasters(masks: [Raster; 5]) -> Result<Self> {
        for (class, mask) in WaterClass::CLASSES.iter().zip(masks.iter()) {
            ensure_aligned(&masks[0], mask)?;
            if let Some(bad) = mask.data().iter().find(|&&v| v != 0.0 && v != 1.0) {
                return Err(Error::InvalidParameter {
                    name: "class mask",
                    value: bad.to_string(),
                    reason: format!("{} mask must only contain 0 and 1", class),
                });
            }
        }
        Ok(Self { masks })
    }

    /// Clears every class outside `valid`, leaving those pixels unclassified.
    pub fn restrict_to(&self, valid: &Mask) -> Result<Self> {
        let mut masks = self.masks.clone();
        for mask in masks.iter_mut() {
            ensure_aligned(&*mask, valid)?;
            let data = Zip::from(mask.data())
                .and(valid.data())
                .par_map_collect(|&v, &keep| if keep { v } else { 0.0 });
            *mask = mask.with_data(data);
        }
        Ok(Self { masks })
    }

    pub fn get(&self, class: WaterClass) -> Option<&Raster> {
        WaterClass::CLASSES
            .iter()
            .position(|&c| c == class)
            .map(|i| &self.masks[i])
    }

    /// (class, mask) pairs in encoder order
    pub fn iter(&self) -> impl Iterator<Item = (WaterClass, &Raster)> {
        WaterClass::CLASSES.into_iter().zip(self.masks.iter())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.masks[0].shape()
    }

    pub(crate) fn rasters(&self) -> &[Raster; 5] {
        &self.masks
    }
}
