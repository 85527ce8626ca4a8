//! Particulate backscattering ratio `bbp_QAA / bbp_Morel`
//!
//! Karenia brevis blooms backscatter less than the Morel (1988) model
//! predicts for their chlorophyll, so a low ratio marks HAB water. The Morel
//! relation is only applied to productive pixels (chlorophyll above a cutoff).

use super::constants::{
    MOREL_BB_MIN, MOREL_BB_SLOPE, MOREL_CHL_EXPONENT, MOREL_LOG_OFFSET, MOREL_LOG_SLOPE,
    MOREL_SCATTERING_SCALE,
};
use crate::error::Result;
use crate::raster::Raster;
use crate::raster::algebra::{safe_div, safe_log10};

/// Morel (1988) particulate backscattering for a chlorophyll concentration.
///
/// `NaN` for non-positive chlorophyll.
pub fn morel_bbp(chl: f64) -> f64 {
    let log_chl = safe_log10(chl);
    MOREL_SCATTERING_SCALE
        * chl.powf(MOREL_CHL_EXPONENT)
        * (MOREL_BB_MIN + MOREL_BB_SLOPE * (MOREL_LOG_OFFSET - MOREL_LOG_SLOPE * log_chl))
}

/// Ratio for one pixel, `NaN` where the pixel is not productive or the ratio
/// is not positive.
pub fn bbp_ratio_pixel(bbp_qaa: f64, chl: f64, chl_cutoff: f64) -> f64 {
    if chl.is_nan() || chl <= chl_cutoff {
        return f64::NAN;
    }
    let ratio = safe_div(bbp_qaa, morel_bbp(chl));
    if ratio > 0.0 { ratio } else { f64::NAN }
}

/// Backscattering ratio raster.
///
/// Both inputs are first restricted to pixels with `chl > chl_cutoff`
/// (strict); the ratio is then restricted to strictly positive values so that
/// pixels missing either input end up as no-data rather than zero.
pub fn backscatter_ratio(bbp_qaa: &Raster, chl: &Raster, chl_cutoff: f64) -> Result<Raster> {
    let productive = chl.gt(chl_cutoff);
    let masked_chl = chl.mask(&productive)?;
    let masked_bbp = bbp_qaa.mask(&productive)?;

    let bbp_morel = masked_chl.map(morel_bbp);
    let ratio = masked_bbp.div(&bbp_morel)?;

    ratio.mask(&ratio.gt(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::constants::DEFAULT_CHL_CUTOFF;

    #[test]
    fn test_morel_at_unit_chlorophyll() {
        // log10(1) = 0 -> 0.3 * 1 * (0.002 + 0.02 * 0.5)
        assert!((morel_bbp(1.0) - 0.3 * 0.012).abs() < 1e-15);
        assert!(morel_bbp(0.0).is_nan());
    }

    #[test]
    fn test_cutoff_is_strict() {
        let chl = Raster::from_vec(vec![1.5, 1.5000001, 3.0, 1.0], 2, 2).unwrap();
        let bbp = Raster::filled(2, 2, 0.01);

        let ratio = backscatter_ratio(&bbp, &chl, DEFAULT_CHL_CUTOFF).unwrap();
        assert!(ratio.is_nodata_at(0, 0));
        assert!(!ratio.is_nodata_at(0, 1));
        assert!(!ratio.is_nodata_at(1, 0));
        assert!(ratio.is_nodata_at(1, 1));

        assert!(bbp_ratio_pixel(0.01, 1.5, DEFAULT_CHL_CUTOFF).is_nan());
    }

    #[test]
    fn test_ratio_by_hand() {
        let chl_value: f64 = 10.0;
        let expected_morel = 0.3 * chl_value.powf(0.62) * (0.002 + 0.02 * (0.5 - 0.25));
        let chl = Raster::filled(1, 1, chl_value);
        let bbp = Raster::filled(1, 1, 0.005);

        let ratio = backscatter_ratio(&bbp, &chl, DEFAULT_CHL_CUTOFF).unwrap();
        let value = ratio.get(0, 0).unwrap();

        assert!((value - 0.005 / expected_morel).abs() < 1e-12, "{value}");
        assert!((bbp_ratio_pixel(0.005, chl_value, DEFAULT_CHL_CUTOFF) - value).abs() < 1e-15);
    }

    #[test]
    fn test_non_positive_ratio_is_masked() {
        let chl = Raster::filled(1, 3, 5.0);
        let bbp = Raster::from_vec(vec![0.0, -0.002, f64::NAN], 1, 3).unwrap();

        let ratio = backscatter_ratio(&bbp, &chl, DEFAULT_CHL_CUTOFF).unwrap();
        assert_eq!(ratio.valid_count(), 0);
    }
}
