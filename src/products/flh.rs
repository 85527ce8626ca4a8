//! Fluorescence Line Height
//!
//! The baseline is a linear interpolation between the two shoulder bands and
//! FLH is the signal of the third band above that baseline.

use crate::error::Result;
use crate::raster::Raster;
use crate::sat_bands::FlhWavelengths;

pub fn baseline_pixel(band1: f64, band2: f64, weight: f64) -> f64 {
    band1 + weight * (band2 - band1)
}

pub fn flh_pixel(band1: f64, band2: f64, band3: f64, wavelengths: &FlhWavelengths) -> f64 {
    band3 - baseline_pixel(band1, band2, wavelengths.baseline_weight())
}

pub fn flh_baseline(band1: &Raster, band2: &Raster, wavelengths: &FlhWavelengths) -> Result<Raster> {
    let weight = wavelengths.baseline_weight();
    band1.zip_map(band2, |b1, b2| baseline_pixel(b1, b2, weight))
}

pub fn fluorescence_line_height(
    band1: &Raster,
    band2: &Raster,
    band3: &Raster,
    wavelengths: &FlhWavelengths,
) -> Result<Raster> {
    let baseline = flh_baseline(band1, band2, wavelengths)?;
    band3.sub(&baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat_bands::Satellites;

    #[test]
    fn test_flat_spectrum_has_zero_flh() {
        let wl = Satellites::Modis.flh_wavelengths();
        let band = Raster::filled(2, 2, 0.7);

        let baseline = flh_baseline(&band, &band, &wl).unwrap();
        assert!(baseline.data().iter().all(|&v| (v - 0.7).abs() < 1e-12));

        let flh = fluorescence_line_height(&band, &band, &band, &wl).unwrap();
        assert!(flh.data().iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_baseline_is_linear_in_weight() {
        let wl = FlhWavelengths::new(600.0, 650.0, 700.0).unwrap();
        assert_eq!(wl.baseline_weight(), 0.5);

        // Halfway between the shoulders
        assert_eq!(baseline_pixel(1.0, 3.0, wl.baseline_weight()), 2.0);
        assert_eq!(flh_pixel(1.0, 3.0, 2.5, &wl), 0.5);
    }

    #[test]
    fn test_modis_flh_by_hand() {
        let wl = Satellites::Modis.flh_wavelengths();
        let w = (746.3 - 676.7) / (746.3 - 665.1);
        let expected = 0.9 - (0.2 + w * (0.6 - 0.2));

        let b1 = Raster::filled(1, 1, 0.2);
        let b2 = Raster::filled(1, 1, 0.6);
        let b3 = Raster::filled(1, 1, 0.9);
        let flh = fluorescence_line_height(&b1, &b2, &b3, &wl).unwrap();

        assert!((flh.get(0, 0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_nodata_shoulder_propagates() {
        let wl = Satellites::Modis.flh_wavelengths();
        let b1 = Raster::from_vec(vec![f64::NAN, 0.2], 1, 2).unwrap();
        let b2 = Raster::filled(1, 2, 0.3);
        let b3 = Raster::filled(1, 2, 0.4);

        let flh = fluorescence_line_height(&b1, &b2, &b3, &wl).unwrap();
        assert!(flh.is_nodata_at(0, 0));
        assert!(!flh.is_nodata_at(0, 1));
    }
}
