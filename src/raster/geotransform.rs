use serde::Deserialize;

/// North-up affine transform from pixel (col, row) to map coordinates.
///
/// `pixel_height` is negative for the usual top-down row order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        }
    }

    /// Builds a transform from the GeoTIFF ModelPixelScale and ModelTiepoint tags.
    ///
    /// The tiepoint maps raster (i, j) to model (x, y); only the first tiepoint is used.
    pub fn from_geotiff_tags(pixel_scale: &[f64], tiepoint: &[f64]) -> Option<Self> {
        if pixel_scale.len() < 2 || tiepoint.len() < 6 {
            return None;
        }

        let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);
        let (sx, sy) = (pixel_scale[0], pixel_scale[1]);

        Some(Self {
            origin_x: x - i * sx,
            origin_y: y + j * sy,
            pixel_width: sx,
            pixel_height: -sy,
        })
    }

    /// Map coordinates of the pixel centre
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.pixel_width,
            self.origin_y + (row as f64 + 0.5) * self.pixel_height,
        )
    }

    /// Fractional pixel coordinates (col, row) of a map coordinate
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) / self.pixel_width,
            (y - self.origin_y) / self.pixel_height,
        )
    }

    /// Nominal ground size of one cell, in map units
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs().max(self.pixel_height.abs())
    }

    /// Same grid within a relative tolerance of one thousandth of a cell
    pub fn approx_eq(&self, other: &GeoTransform) -> bool {
        let tol = self.cell_size() * 1e-3;
        (self.origin_x - other.origin_x).abs() <= tol
            && (self.origin_y - other.origin_y).abs() <= tol
            && (self.pixel_width - other.pixel_width).abs() <= tol
            && (self.pixel_height - other.pixel_height).abs() <= tol
    }
}
