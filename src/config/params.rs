use serde::Deserialize;

use crate::products::constants::{
    DEFAULT_BBP_RATIO_THRESHOLD, DEFAULT_BRIGHTNESS_PERCENTILE, DEFAULT_CHL_CUTOFF,
    DEFAULT_FLH_PERCENTILE, Oc3Coefficients,
};
use crate::sat_bands::{FlhWavelengths, Satellites};
use crate::scene::SamplingParams;

/// Tunable parameters of the classifier. Every field has a default so a
/// config only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    pub sensor: Satellites,
    /// Overrides the sensor's fluorescence band centres
    pub flh_wavelengths: Option<FlhWavelengths>,
    pub oc3: Oc3Coefficients,
    /// Chlorophyll (mg m^-3) above which the backscattering ratio is computed
    pub chl_cutoff: f64,
    pub bbp_ratio_threshold: f64,
    /// Percentile of red and green taken as the brightness threshold
    pub brightness_percentile: f64,
    pub flh_percentile: f64,
    pub sampling: SamplingParams,
    /// Linear stretch of the ERGB red/green bands to 0–255 before thresholding
    pub ergb_stretch_max: Option<f64>,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            sensor: Satellites::default(),
            flh_wavelengths: None,
            oc3: Oc3Coefficients::default(),
            chl_cutoff: DEFAULT_CHL_CUTOFF,
            bbp_ratio_threshold: DEFAULT_BBP_RATIO_THRESHOLD,
            brightness_percentile: DEFAULT_BRIGHTNESS_PERCENTILE,
            flh_percentile: DEFAULT_FLH_PERCENTILE,
            sampling: SamplingParams::default(),
            ergb_stretch_max: None,
        }
    }
}

impl ClassifierParams {
    pub fn flh_wavelengths(&self) -> FlhWavelengths {
        self.flh_wavelengths
            .unwrap_or_else(|| self.sensor.flh_wavelengths())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.flh_wavelengths().validate()?;
        self.sampling.validate()?;

        if self.oc3.0.iter().any(|c| !c.is_finite()) {
            return Err("OC3 coefficients must be finite".to_string());
        }

        for (name, value) in [
            ("brightness_percentile", self.brightness_percentile),
            ("flh_percentile", self.flh_percentile),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be within 0-100, got {}", name, value));
            }
        }

        for (name, value) in [
            ("chl_cutoff", self.chl_cutoff),
            ("bbp_ratio_threshold", self.bbp_ratio_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }

        if let Some(max) = self.ergb_stretch_max
            && !(max.is_finite() && max > 0.0)
        {
            return Err(format!("ergb_stretch_max must be positive, got {}", max));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = ClassifierParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.chl_cutoff, 1.5);
        assert_eq!(params.bbp_ratio_threshold, 0.8);
        assert_eq!(params.flh_wavelengths(), Satellites::Modis.flh_wavelengths());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let params: ClassifierParams = serde_json::from_str(
            r#"{ "sensor": "meris", "flh_percentile": 95.0, "sampling": { "scale": 300.0 } }"#,
        )
        .unwrap();

        assert_eq!(params.sensor, Satellites::Meris);
        assert_eq!(params.flh_percentile, 95.0);
        assert_eq!(params.brightness_percentile, 25.0);
        assert_eq!(params.sampling.scale, Some(300.0));
        assert_eq!(params.flh_wavelengths().lambda2, 681.0);
    }

    #[test]
    fn test_wavelength_override() {
        let params: ClassifierParams = serde_json::from_str(
            r#"{ "flh_wavelengths": { "lambda1": 667.0, "lambda2": 678.0, "lambda3": 748.0 } }"#,
        )
        .unwrap();
        assert_eq!(params.flh_wavelengths().lambda3, 748.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_percentile = ClassifierParams {
            flh_percentile: 120.0,
            ..ClassifierParams::default()
        };
        assert!(bad_percentile.validate().is_err());

        let bad_wavelengths = ClassifierParams {
            flh_wavelengths: Some(FlhWavelengths {
                lambda1: 700.0,
                lambda2: 680.0,
                lambda3: 750.0,
            }),
            ..ClassifierParams::default()
        };
        assert!(bad_wavelengths.validate().is_err());

        let bad_stretch = ClassifierParams {
            ergb_stretch_max: Some(0.0),
            ..ClassifierParams::default()
        };
        assert!(bad_stretch.validate().is_err());
    }
}
