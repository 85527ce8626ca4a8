//! Derived products
//!
//! Intermediate rasters computed once per scene from the raw band set and
//! shared by the scene statistics and the classifier.

pub mod backscatter;
pub mod chlorophyll;
pub mod constants;
pub mod ergb;
pub mod flh;

pub use backscatter::{backscatter_ratio, morel_bbp};
pub use chlorophyll::oc3_chlorophyll;
pub use constants::*;
pub use flh::fluorescence_line_height;

use crate::bands::{BandId, BandSet};
use crate::config::ClassifierParams;
use crate::error::Result;
use crate::raster::Raster;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DerivedProducts {
    /// ERGB red as used for the brightness test (stretched when configured)
    pub red: Raster,
    /// ERGB green as used for the brightness test (stretched when configured)
    pub green: Raster,
    /// OC3 chlorophyll-a (mg m^-3)
    pub chlorophyll: Raster,
    pub flh: Raster,
    /// bbp_QAA / bbp_Morel over productive pixels, no-data elsewhere
    pub bbp_ratio: Raster,
    /// `chl − 10 · FLH`: chlorophyll not explained by fluorescence, typically
    /// CDOM-rich water misread as chlorophyll by OC3
    pub chl_error: Raster,
}

impl DerivedProducts {
    pub fn compute(bands: &BandSet, params: &ClassifierParams) -> Result<Self> {
        let (red, green) = match params.ergb_stretch_max {
            Some(max) => (
                ergb::stretch_to_byte(bands.band(BandId::Red)?, max),
                ergb::stretch_to_byte(bands.band(BandId::Green)?, max),
            ),
            None => (
                bands.band(BandId::Red)?.clone(),
                bands.band(BandId::Green)?.clone(),
            ),
        };

        let chlorophyll = oc3_chlorophyll(
            bands.band(BandId::ChlPrimary)?,
            bands.band(BandId::ChlSecondary)?,
            &params.oc3,
        )?;
        debug!("OC3 chlorophyll: {} valid pixels", chlorophyll.valid_count());

        let flh = fluorescence_line_height(
            bands.band(BandId::Flh1)?,
            bands.band(BandId::Flh2)?,
            bands.band(BandId::Flh3)?,
            &params.flh_wavelengths(),
        )?;
        debug!("FLH: {} valid pixels", flh.valid_count());

        let chl_input = bands.band(BandId::BbpMorelInput)?;
        let bbp_ratio = backscatter_ratio(bands.band(BandId::BbpQaa)?, chl_input, params.chl_cutoff)?;
        debug!(
            "bbp ratio: {} productive pixels (chl > {})",
            bbp_ratio.valid_count(),
            params.chl_cutoff
        );

        let chl_error = chl_input.sub(&flh.mul_scalar(CHL_ERROR_FLH_SCALE))?;

        Ok(Self {
            red,
            green,
            chlorophyll,
            flh,
            bbp_ratio,
            chl_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn uniform_bands(value: f64) -> BTreeMap<BandId, Raster> {
        BandId::REQUIRED
            .iter()
            .map(|&id| (id, Raster::filled(2, 2, value)))
            .collect()
    }

    #[test]
    fn test_products_share_the_band_grid() {
        let bands = BandSet::new(uniform_bands(2.0)).unwrap();
        let products = DerivedProducts::compute(&bands, &ClassifierParams::default()).unwrap();

        for raster in [
            &products.red,
            &products.chlorophyll,
            &products.flh,
            &products.bbp_ratio,
            &products.chl_error,
        ] {
            assert_eq!(raster.rows(), 2);
            assert_eq!(raster.cols(), 2);
        }

        // Flat FLH spectrum -> chl error equals the input chlorophyll
        assert!(products.flh.data().iter().all(|v| v.abs() < 1e-12));
        assert!(products.chl_error.data().iter().all(|v| (v - 2.0).abs() < 1e-12));
    }

    #[test]
    fn test_stretch_applies_to_brightness_bands_only() {
        let bands = BandSet::new(uniform_bands(10.0)).unwrap();
        let params = ClassifierParams {
            ergb_stretch_max: Some(20.0),
            ..ClassifierParams::default()
        };
        let products = DerivedProducts::compute(&bands, &params).unwrap();

        assert_eq!(products.red.get(0, 0), Some(128.0));
        assert_eq!(products.green.get(1, 1), Some(128.0));
        assert!((products.chlorophyll.get(0, 0).unwrap() - 10f64.powf(0.25)).abs() < 1e-12);
    }
}
