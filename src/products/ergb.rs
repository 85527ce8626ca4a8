//! Enhanced RGB display stretch
//!
//! ERGB scenes are usually shown as a byte image with a linear stretch from 0
//! to a fixed maximum. When the brightness thresholds must be taken on the
//! stretched image, the red and green bands go through the same stretch.

use crate::raster::Raster;

/// Linear stretch of `[0, max]` onto `[0, 255]`, rounded and clamped.
///
/// Values above `max` saturate at 255, no-data stays no-data.
pub fn stretch_to_byte(band: &Raster, max: f64) -> Raster {
    band.map(|v| (v / max * 255.0).round().clamp(0.0, 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stretch_saturates_and_keeps_nodata() {
        let band = Raster::from_vec(vec![0.0, 10.0, 40.0, f64::NAN], 2, 2).unwrap();
        let out = stretch_to_byte(&band, 20.0);

        assert_eq!(out.get(0, 0), Some(0.0));
        assert_eq!(out.get(0, 1), Some(128.0));
        assert_eq!(out.get(1, 0), Some(255.0));
        assert!(out.is_nodata_at(1, 1));
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let band = Raster::filled(1, 1, -3.0);
        assert_eq!(stretch_to_byte(&band, 20.0).get(0, 0), Some(0.0));
    }
}
