use crate::bbox::Bbox;
use crate::error::{Error, Result};
use crate::raster::Grid;

/// Rectangle of pixels, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub row: usize,
    pub col: usize,
    pub rows: usize,
    pub cols: usize,
}

impl PixelWindow {
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Intersection with a grid of `shape`
    fn clamp_to(self, shape: (usize, usize)) -> Self {
        let row = self.row.min(shape.0);
        let col = self.col.min(shape.1);
        Self {
            row,
            col,
            rows: self.rows.min(shape.0 - row),
            cols: self.cols.min(shape.1 - col),
        }
    }
}

/// Area over which scene statistics are taken.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RegionOfInterest {
    /// The whole raster footprint
    #[default]
    Full,
    Window(PixelWindow),
    /// Geographic box; requires georeferenced rasters
    Bbox(Bbox),
}

impl RegionOfInterest {
    /// Pixel window of this region on `grid`, clipped to the grid.
    pub fn resolve(&self, grid: &impl Grid) -> Result<PixelWindow> {
        let shape = grid.shape();

        match self {
            RegionOfInterest::Full => Ok(PixelWindow {
                row: 0,
                col: 0,
                rows: shape.0,
                cols: shape.1,
            }),
            RegionOfInterest::Window(window) => Ok(window.clamp_to(shape)),
            RegionOfInterest::Bbox(bbox) => {
                let gt = grid.transform().ok_or_else(|| Error::InvalidParameter {
                    name: "region",
                    value: format!("{:?}", bbox),
                    reason: "a bounding box needs a georeferenced raster".to_string(),
                })?;

                let (x0, y0) = gt.geo_to_pixel(bbox.xmin, bbox.ymax);
                let (x1, y1) = gt.geo_to_pixel(bbox.xmax, bbox.ymin);

                // Either axis may be flipped depending on the sign of the pixel size
                let clip = |v: f64, max: usize| v.max(0.0).min(max as f64) as usize;
                let start_x = clip(x0.min(x1).floor(), shape.1);
                let end_x = clip(x0.max(x1).ceil(), shape.1);
                let start_y = clip(y0.min(y1).floor(), shape.0);
                let end_y = clip(y0.max(y1).ceil(), shape.0);

                Ok(PixelWindow {
                    row: start_y,
                    col: start_x,
                    rows: end_y - start_y,
                    cols: end_x - start_x,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{GeoTransform, Raster};

    #[test]
    fn test_full_region_covers_grid() {
        let r = Raster::filled(4, 6, 0.0);
        let w = RegionOfInterest::Full.resolve(&r).unwrap();
        assert_eq!(w, PixelWindow { row: 0, col: 0, rows: 4, cols: 6 });
    }

    #[test]
    fn test_window_is_clipped() {
        let r = Raster::filled(4, 6, 0.0);
        let roi = RegionOfInterest::Window(PixelWindow { row: 2, col: 4, rows: 10, cols: 10 });
        assert_eq!(roi.resolve(&r).unwrap(), PixelWindow { row: 2, col: 4, rows: 2, cols: 2 });

        let outside = RegionOfInterest::Window(PixelWindow { row: 9, col: 9, rows: 1, cols: 1 });
        assert!(outside.resolve(&r).unwrap().is_empty());
    }

    #[test]
    fn test_bbox_to_pixels() {
        // Quarter-degree pixels from (-85, 30)
        let r = Raster::filled(20, 20, 0.0).with_transform(GeoTransform::new(-85.0, 30.0, 0.25, -0.25));
        let bbox = Bbox::new(-84.0, -83.0, 27.0, 29.0).unwrap();

        let w = RegionOfInterest::Bbox(bbox).resolve(&r).unwrap();
        assert_eq!(w.col, 4);
        assert_eq!(w.cols, 4);
        assert_eq!(w.row, 4);
        assert_eq!(w.rows, 8);
    }

    #[test]
    fn test_bbox_needs_geotransform() {
        let r = Raster::filled(5, 5, 0.0);
        let bbox = Bbox::new(-84.0, -83.0, 27.0, 29.0).unwrap();
        assert!(RegionOfInterest::Bbox(bbox).resolve(&r).is_err());
    }

    #[test]
    fn test_bbox_outside_scene_is_empty() {
        let r = Raster::filled(10, 10, 0.0).with_transform(GeoTransform::new(-85.0, 30.0, 0.1, -0.1));
        let bbox = Bbox::new(10.0, 11.0, 0.0, 1.0).unwrap();
        assert!(RegionOfInterest::Bbox(bbox).resolve(&r).unwrap().is_empty());
    }
}
