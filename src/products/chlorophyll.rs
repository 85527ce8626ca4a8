//! OC3-family band-ratio chlorophyll-a
//!
//! NASA OC3:
//! - Rrs1 = blue wavelength (443, 490 or 510 nm, whichever is largest per pixel upstream)
//! - Rrs2 = green wavelength (547, 555 or 565 nm)
//! - X = log10(Rrs1 / Rrs2)
//! - chlor_a = 10^(a0 + a1·X + a2·X² + a3·X³ + a4·X⁴)

use super::constants::Oc3Coefficients;
use crate::error::Result;
use crate::raster::Raster;
use crate::raster::algebra::{safe_div, safe_log10};

/// Chlorophyll-a (mg m^-3) for a single blue/green reflectance pair.
///
/// Returns `NaN` when the band ratio is not positive or either input is no-data.
pub fn oc3_pixel(blue: f64, green: f64, coefficients: &Oc3Coefficients) -> f64 {
    let r = safe_log10(safe_div(blue, green));
    if r.is_nan() {
        return f64::NAN;
    }
    10f64.powf(coefficients.exponent(r))
}

/// Chlorophyll-a raster from the blue and green OC3 bands.
pub fn oc3_chlorophyll(
    blue: &Raster,
    green: &Raster,
    coefficients: &Oc3Coefficients,
) -> Result<Raster> {
    let ratio = blue.div(green)?.log10();
    Ok(ratio.map(|r| 10f64.powf(coefficients.exponent(r))))
}
