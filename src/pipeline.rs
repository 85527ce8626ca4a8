//! End-to-end classification of one scene
//!
//! raw bands → derived products → scene thresholds → class masks → codes.
//! The thresholds are the only whole-region reductions and are computed once,
//! before any pixel is classified.

use crate::bands::BandSet;
use crate::classify::{ClassMasks, ClassificationResult, DecisionRules, encode};
use crate::config::{ClassifierParams, ConfigError};
use crate::error::Result;
use crate::products::DerivedProducts;
use crate::scene::{RegionOfInterest, SceneThresholds};
use crate::utils;
use tracing::{debug, info};

/// Everything a run produced, kept for diagnostics and export.
#[derive(Debug, Clone)]
pub struct ClassificationOutput {
    pub result: ClassificationResult,
    pub products: DerivedProducts,
    pub thresholds: SceneThresholds,
    pub masks: ClassMasks,
}

#[derive(Debug, Clone, Default)]
pub struct HabClassifier {
    params: ClassifierParams,
}

impl HabClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    /// Classifies every pixel of `bands`. Percentile thresholds are taken over
    /// `region` only; the classification itself covers the whole grid.
    pub fn classify(&self, bands: &BandSet, region: &RegionOfInterest) -> Result<ClassificationOutput> {
        self.params.validate().map_err(ConfigError::Invalid)?;

        let window = region.resolve(bands.reference())?;
        let (rows, cols) = bands.shape();
        info!(
            "Classifying {}x{} scene, statistics over {}x{} window at ({}, {})",
            rows, cols, window.rows, window.cols, window.row, window.col
        );

        debug!("{} sensor, {}", self.params.sensor, self.params.flh_wavelengths());

        let products = DerivedProducts::compute(bands, &self.params)?;

        let thresholds = SceneThresholds::compute(&products, region, &self.params)?;
        info!("Scene thresholds: {}", thresholds);

        let rules = DecisionRules::new(thresholds, self.params.bbp_ratio_threshold);
        let valid = bands.valid_mask()?;
        debug!("{} pixels with no-data in a required band", valid.not().count());
        let masks = ClassMasks::compute(&products, &rules)?.restrict_to(&valid)?;
        for (class, mask) in masks.iter() {
            debug!("{} mask: {} pixels", class, mask.data().sum() as usize);
        }

        let result = encode(&masks)?;
        utils::log_class_summary(&result);

        Ok(ClassificationOutput {
            result,
            products,
            thresholds,
            masks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandId;
    use crate::classify::WaterClass;
    use crate::error::Error;
    use crate::products::morel_bbp;
    use crate::raster::Raster;
    use crate::scene::PixelWindow;
    use std::collections::BTreeMap;

    fn band(values: [f64; 4]) -> Raster {
        Raster::from_vec(values.to_vec(), 2, 2).unwrap()
    }

    /// Pixel 0 is dark, fluorescent and under-backscattering; pixels 1 and 2
    /// are bright with low fluorescence; pixel 3 has no red reflectance.
    fn scene() -> BTreeMap<BandId, Raster> {
        let morel = morel_bbp(10.0);
        BTreeMap::from([
            (BandId::Red, band([1.0, 5.0, 5.0, f64::NAN])),
            (BandId::Green, band([1.0, 5.0, 5.0, 5.0])),
            (BandId::ChlPrimary, band([0.012; 4])),
            (BandId::ChlSecondary, band([0.010; 4])),
            (BandId::Flh1, band([0.0; 4])),
            (BandId::Flh2, band([0.0; 4])),
            (BandId::Flh3, band([0.1, 0.0, 0.0, 0.0])),
            (BandId::BbpQaa, band([0.5 * morel, morel, morel, morel])),
            (BandId::BbpMorelInput, band([10.0; 4])),
        ])
    }

    #[test]
    fn test_end_to_end_scene() {
        let bands = BandSet::new(scene()).unwrap();
        let output = HabClassifier::default()
            .classify(&bands, &RegionOfInterest::Full)
            .unwrap();

        // red 25th percentile of [1, 5, 5] and green of [1, 5, 5, 5]
        assert_eq!(output.thresholds.red, 3.0);
        assert_eq!(output.thresholds.green, 4.0);
        // FLH 90th percentile of [0, 0, 0, 0.1]
        assert!((output.thresholds.flh - 0.07).abs() < 1e-12);

        assert!((output.products.bbp_ratio.get(0, 0).unwrap() - 0.5).abs() < 1e-12);

        let result = &output.result;
        assert_eq!(result.class_at(0, 0), Some(WaterClass::HabRich));
        assert_eq!(result.class_at(0, 1), Some(WaterClass::ShallowClear));
        assert_eq!(result.class_at(1, 0), Some(WaterClass::ShallowClear));
        assert_eq!(result.class_at(1, 1), Some(WaterClass::Unclassified));
        assert_eq!(result.classified_count(), 3);
    }

    /// Pixel 0 is bright with high FLH; the others are at the thresholds.
    fn bright_fluorescent_scene() -> BTreeMap<BandId, Raster> {
        let mut bands = scene();
        bands.insert(BandId::Red, band([9.0, 1.0, 1.0, 1.0]));
        bands.insert(BandId::Green, band([9.0, 1.0, 1.0, 1.0]));
        bands.insert(BandId::Flh3, band([0.5, 0.0, 0.0, 0.0]));
        bands
    }

    #[test]
    fn test_nodata_in_any_required_band_is_unclassified() {
        let control = HabClassifier::default()
            .classify(&BandSet::new(bright_fluorescent_scene()).unwrap(), &RegionOfInterest::Full)
            .unwrap();
        assert_eq!(control.result.class_at(0, 0), Some(WaterClass::SedimentRich));

        // bands that do not feed the sediment test still void the pixel
        for id in [BandId::ChlPrimary, BandId::BbpQaa, BandId::BbpMorelInput] {
            let mut bands = bright_fluorescent_scene();
            bands.insert(id, band([f64::NAN, 1.0, 1.0, 1.0]));

            let output = HabClassifier::default()
                .classify(&BandSet::new(bands).unwrap(), &RegionOfInterest::Full)
                .unwrap();
            assert_eq!(output.result.class_at(0, 0), Some(WaterClass::Unclassified), "{}", id);
            assert_eq!(output.masks.get(WaterClass::SedimentRich).unwrap().get(0, 0), Some(0.0));
        }
    }

    #[test]
    fn test_zero_backscatter_is_not_hab_rich() {
        let mut bands = scene();
        bands.insert(BandId::BbpQaa, band([0.0, 0.0, 0.0, 0.0]));

        let output = HabClassifier::default()
            .classify(&BandSet::new(bands).unwrap(), &RegionOfInterest::Full)
            .unwrap();

        assert!(output.products.bbp_ratio.is_nodata_at(0, 0));
        assert_eq!(output.result.class_at(0, 0), Some(WaterClass::Unclassified));
    }

    #[test]
    fn test_all_nodata_scene_is_unclassified() {
        let bands = BandSet::new(
            BandId::REQUIRED
                .iter()
                .map(|&id| (id, Raster::nodata(3, 3)))
                .collect(),
        )
        .unwrap();

        let output = HabClassifier::default()
            .classify(&bands, &RegionOfInterest::Full)
            .unwrap();

        assert!(!output.thresholds.is_complete());
        assert!(output.result.codes().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_region_restricts_statistics_only() {
        let bands = BandSet::new(scene()).unwrap();
        // top row only: red [1, 5], FLH [0.1, 0]
        let region = RegionOfInterest::Window(PixelWindow {
            row: 0,
            col: 0,
            rows: 1,
            cols: 2,
        });

        let output = HabClassifier::default().classify(&bands, &region).unwrap();

        assert_eq!(output.thresholds.red, 2.0);
        assert!((output.thresholds.flh - 0.09).abs() < 1e-12);
        // pixels outside the window are still classified
        assert_eq!(output.result.class_at(1, 0), Some(WaterClass::ShallowClear));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let bands = BandSet::new(scene()).unwrap();
        let classifier = HabClassifier::new(ClassifierParams {
            brightness_percentile: 150.0,
            ..ClassifierParams::default()
        });

        assert!(matches!(
            classifier.classify(&bands, &RegionOfInterest::Full),
            Err(Error::Config(ConfigError::Invalid(_)))
        ));
    }
}
