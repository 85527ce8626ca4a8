//! Algorithm coefficients and default thresholds
//!
//! Coefficients for the chlorophyll polynomial and the Morel backscattering
//! model, plus the classification defaults from Hu et al. (2013) as applied
//! to MODIS Aqua scenes.

use serde::Deserialize;

/// Coefficients `a0..a4` of the OC3 band-ratio polynomial
/// `chl = 10^(a0 + a1·R + a2·R² + a3·R³ + a4·R⁴)` with `R = log10(blue / green)`.
///
/// Swappable so that the calculator can be reused with other sensor band sets.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Oc3Coefficients(pub [f64; 5]);

/// OC3 coefficients used for the MODIS red tide scenes
pub const OC3_DEFAULT: Oc3Coefficients = Oc3Coefficients([0.2500, -2.4752, 1.4061, -2.8233, 0.5405]);

impl Oc3Coefficients {
    /// Polynomial exponent for a given log band ratio (Horner form)
    pub fn exponent(&self, r: f64) -> f64 {
        self.0.iter().rev().fold(0.0, |acc, &a| acc * r + a)
    }
}

impl Default for Oc3Coefficients {
    fn default() -> Self {
        OC3_DEFAULT
    }
}

/// Morel (1988) particulate backscattering: `0.3 · chl^0.62 · (0.002 + 0.02 · (0.5 − 0.25 · log10(chl)))`
pub const MOREL_SCATTERING_SCALE: f64 = 0.3;
pub const MOREL_CHL_EXPONENT: f64 = 0.62;
pub const MOREL_BB_MIN: f64 = 0.002;
pub const MOREL_BB_SLOPE: f64 = 0.02;
pub const MOREL_LOG_OFFSET: f64 = 0.5;
pub const MOREL_LOG_SLOPE: f64 = 0.25;

/// Chlorophyll (mg m^-3) above which the Morel model is applied
pub const DEFAULT_CHL_CUTOFF: f64 = 1.5;

/// bbp ratio separating non-bloom phytoplankton (above) from HAB water (below)
pub const DEFAULT_BBP_RATIO_THRESHOLD: f64 = 0.8;

/// Percentile of the red and green ERGB bands splitting dark from bright water
pub const DEFAULT_BRIGHTNESS_PERCENTILE: f64 = 25.0;

/// Percentile of FLH splitting high from low fluorescence
pub const DEFAULT_FLH_PERCENTILE: f64 = 90.0;

/// FLH scale factor in the chlorophyll error product `chl − 10 · FLH`
pub const CHL_ERROR_FLH_SCALE: f64 = 10.0;

/// Upper bound on the number of samples entering a percentile
pub const DEFAULT_MAX_SAMPLES: u64 = 1_000_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponent_matches_expanded_polynomial() {
        let c = OC3_DEFAULT;
        let r: f64 = -0.3;
        let expected = 0.2500 - 2.4752 * r + 1.4061 * r.powi(2) - 2.8233 * r.powi(3)
            + 0.5405 * r.powi(4);

        assert!((c.exponent(r) - expected).abs() < 1e-12);
        assert_eq!(c.exponent(0.0), 0.25);
    }
}
