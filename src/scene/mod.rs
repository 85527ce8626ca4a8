//! Scene statistics
//!
//! Percentile thresholds computed once per scene over the region of interest.
//! They adapt the brightness and fluorescence tests to each scene's
//! illumination and turbidity, and they are the only whole-scene reductions
//! in the pipeline.

pub mod percentile;
pub mod region;

pub use percentile::{SamplingParams, percentile};
pub use region::{PixelWindow, RegionOfInterest};

use crate::config::ClassifierParams;
use crate::error::Result;
use crate::products::DerivedProducts;
use serde::Serialize;
use std::fmt::Display;
use tracing::warn;

/// Scene-wide thresholds handed to the classifier.
///
/// A `NaN` threshold means its percentile found no valid sample; every test
/// against it fails, so the dependent classes stay empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneThresholds {
    /// Brightness percentile of the ERGB red band (25th by default)
    pub red: f64,
    /// Brightness percentile of the ERGB green band (25th by default)
    pub green: f64,
    /// FLH percentile (90th by default)
    pub flh: f64,
}

impl SceneThresholds {
    pub fn compute(
        products: &DerivedProducts,
        region: &RegionOfInterest,
        params: &ClassifierParams,
    ) -> Result<Self> {
        let sampling = &params.sampling;
        let thresholds = Self {
            red: percentile(&products.red, params.brightness_percentile, region, sampling)?,
            green: percentile(&products.green, params.brightness_percentile, region, sampling)?,
            flh: percentile(&products.flh, params.flh_percentile, region, sampling)?,
        };

        if !thresholds.is_complete() {
            warn!("Scene thresholds are incomplete ({}), affected classes will be empty", thresholds);
        }

        Ok(thresholds)
    }

    /// Whether every threshold holds a value
    pub fn is_complete(&self) -> bool {
        !(self.red.is_nan() || self.green.is_nan() || self.flh.is_nan())
    }
}

impl Display for SceneThresholds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "red: {:.4}, green: {:.4}, FLH: {:.5}",
            self.red, self.green, self.flh
        )
    }
}
